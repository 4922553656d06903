use axum::{Json, extract::State};
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::auth::{
    ChangeCredentialsRequest, LoginRequest, LoginResponse, validate_change_credentials,
    validate_login_request,
};
use crate::models::shared::MessageResponse;
use crate::state::AppState;
use crate::utils::admin;

/// Verify admin credentials.
#[utoipa::path(
    post,
    path = "/",
    tag = "Auth",
    operation_id = "login",
    summary = "Verify admin credentials",
    description = "Checks the username and password against the stored salted hash. No session or token is issued; clients send credentials with each privileged request.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials valid", body = LoginResponse),
        (status = 400, description = "Missing fields (BAD_REQUEST)", body = ErrorBody),
        (status = 401, description = "Invalid credentials (UNAUTHORIZED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    validate_login_request(&payload)?;

    let admin = admin::verify_credentials(&state.db, &payload.username, &payload.password).await?;

    Ok(Json(LoginResponse::from(admin)))
}

/// Rotate the admin password.
#[utoipa::path(
    put,
    path = "/credentials",
    tag = "Auth",
    operation_id = "changeCredentials",
    summary = "Change the admin password",
    description = "Requires the current password. The new password must be 8-128 characters and, when `confirmNewPassword` is sent, match it. A fresh salt is generated.",
    request_body = ChangeCredentialsRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Missing fields (BAD_REQUEST) or weak password (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid current credentials (UNAUTHORIZED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn change_credentials(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ChangeCredentialsRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_change_credentials(&payload)?;

    let admin = admin::change_password(
        &state.db,
        &payload.username,
        &payload.old_password,
        &payload.new_password,
    )
    .await?;

    info!(admin_id = admin.id, "Admin password changed");

    Ok(Json(MessageResponse::new(
        "Admin credentials updated successfully",
    )))
}
