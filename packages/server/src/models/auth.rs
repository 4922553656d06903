use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Minimum accepted length for a new admin password.
pub const MIN_PASSWORD_LEN: usize = 8;
/// Maximum accepted length for a new admin password.
pub const MAX_PASSWORD_LEN: usize = 128;

/// Request body for admin login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "admin")]
    pub username: String,
    #[serde(default)]
    #[schema(example = "wall-of-disgrace-admin")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".into(),
        ));
    }
    Ok(())
}

/// Request body for rotating the admin password.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeCredentialsRequest {
    #[serde(default)]
    #[schema(example = "admin")]
    pub username: String,
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
    /// When present, must equal `newPassword`.
    pub confirm_new_password: Option<String>,
}

pub fn validate_change_credentials(payload: &ChangeCredentialsRequest) -> Result<(), AppError> {
    if payload.username.trim().is_empty()
        || payload.old_password.is_empty()
        || payload.new_password.is_empty()
    {
        return Err(AppError::BadRequest(
            "Username, current password, and new password are required".into(),
        ));
    }
    let len = payload.new_password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(AppError::Validation(format!(
            "New password must be {MIN_PASSWORD_LEN}-{MAX_PASSWORD_LEN} characters"
        )));
    }
    if let Some(confirm) = &payload.confirm_new_password
        && confirm != &payload.new_password
    {
        return Err(AppError::Validation(
            "New password and confirmation do not match".into(),
        ));
    }
    Ok(())
}

/// Identity of the authenticated admin.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AdminUser {
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = 1)]
    pub id: i32,
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    #[schema(example = "Authentication successful")]
    pub message: String,
    pub user: AdminUser,
}

impl From<crate::entity::admin::Model> for LoginResponse {
    fn from(admin: crate::entity::admin::Model) -> Self {
        Self {
            message: "Authentication successful".into(),
            user: AdminUser {
                username: admin.username,
                id: admin.id,
            },
        }
    }
}
