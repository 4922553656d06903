use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::AppError;

/// Numeric record id taken from the `{id}` path segment.
///
/// Anything that does not parse as an integer is rejected with
/// `AppError::BadRequest` instead of axum's plain-text rejection.
pub struct IdPath(pub i32);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        parse_id(&raw).map(IdPath)
    }
}

fn parse_id(raw: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| AppError::BadRequest("Invalid ID format".into()))
}
