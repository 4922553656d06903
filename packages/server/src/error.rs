use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error kind. One of: `BAD_REQUEST`, `UNAUTHORIZED`,
    /// `NOT_FOUND`, `VALIDATION_ERROR`, `DUPLICATE_ERROR`, `INTERNAL_ERROR`.
    #[schema(example = "NOT_FOUND")]
    pub error: &'static str,
    /// Human-readable error description.
    #[schema(example = "Cheater not found")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    /// Malformed id or a missing top-level field.
    BadRequest(String),
    /// Credential mismatch. Never says whether the username exists.
    Unauthorized(String),
    NotFound(String),
    /// A field failed its shape or content constraints.
    Validation(String),
    /// Unique id collision.
    Duplicate(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "BAD_REQUEST",
                    message: msg,
                },
            ),
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    error: "UNAUTHORIZED",
                    message: msg,
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::Duplicate(msg) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    error: "DUPLICATE_ERROR",
                    message: msg,
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::debug!("Unique constraint caught on write: {detail}");
                AppError::Duplicate("A record with this ID already exists".into())
            }
            _ => AppError::Internal(err.to_string()),
        }
    }
}
