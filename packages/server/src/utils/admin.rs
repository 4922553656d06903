use sea_orm::*;

use crate::entity::admin;
use crate::error::AppError;
use crate::utils::hash;

/// Shared by every credential failure so callers cannot tell a missing
/// username from a wrong password.
const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Look up an admin by username and check the password against its stored salt.
pub async fn verify_credentials<C: ConnectionTrait>(
    db: &C,
    username: &str,
    password: &str,
) -> Result<admin::Model, AppError> {
    let admin = admin::Entity::find()
        .filter(admin::Column::Username.eq(username.trim()))
        .one(db)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.into()))?;

    let is_valid = hash::verify_password(password, &admin.salt, &admin.hashed_password)
        .map_err(|e| AppError::Internal(format!("Password verify error: {e}")))?;

    if !is_valid {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    Ok(admin)
}

/// Replace an admin's password after checking the current one.
///
/// A fresh salt is generated on every change, so the old password stops
/// verifying as soon as the row is written.
pub async fn change_password<C: ConnectionTrait>(
    db: &C,
    username: &str,
    old_password: &str,
    new_password: &str,
) -> Result<admin::Model, AppError> {
    let admin = verify_credentials(db, username, old_password)
        .await
        .map_err(|e| match e {
            AppError::Unauthorized(_) => {
                AppError::Unauthorized("Invalid username or current password".into())
            }
            other => other,
        })?;

    let hashed = hash::hash_password(new_password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {e}")))?;

    let mut active: admin::ActiveModel = admin.into();
    active.salt = Set(hashed.salt);
    active.hashed_password = Set(hashed.hashed_password);
    active.updated_at = Set(chrono::Utc::now());

    Ok(active.update(db).await?)
}
