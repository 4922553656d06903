use axum::{Json, extract::State};
use serde::Serialize;

use crate::database;
use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    operation_id = "health",
    summary = "Liveness check",
    description = "Returns `ok` once the database answers a trivial query.",
    responses(
        (status = 200, description = "Service and database reachable", body = HealthResponse),
        (status = 500, description = "Database unreachable (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    database::ping(&state.db).await?;
    Ok(Json(HealthResponse { status: "ok" }))
}
