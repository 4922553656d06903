use axum::{extract::FromRequestParts, http::request::Parts};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::admin::verify_credentials;

/// Write access to the record endpoints.
///
/// When `auth.require_admin_for_writes` is off this always succeeds with
/// `username: None`. When it is on, the request must carry
/// `Authorization: Basic <base64(username:password)>` and the credentials are
/// checked against the admin table on every request.
pub struct WriteAccess {
    pub username: Option<String>,
}

impl FromRequestParts<AppState> for WriteAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !state.config.auth.require_admin_for_writes {
            return Ok(WriteAccess { username: None });
        }

        let header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Admin credentials required".into()))?;

        let (username, password) = parse_basic(header)?;
        let admin = verify_credentials(&state.db, &username, &password).await?;

        Ok(WriteAccess {
            username: Some(admin.username),
        })
    }
}

fn parse_basic(header: &str) -> Result<(String, String), AppError> {
    let malformed = || AppError::Unauthorized("Malformed Basic authorization header".into());

    let encoded = header.strip_prefix("Basic ").ok_or_else(malformed)?;
    let decoded = STANDARD.decode(encoded.trim()).map_err(|_| malformed())?;
    let decoded = String::from_utf8(decoded).map_err(|_| malformed())?;
    let (username, password) = decoded.split_once(':').ok_or_else(malformed)?;

    Ok((username.to_string(), password.to_string()))
}
