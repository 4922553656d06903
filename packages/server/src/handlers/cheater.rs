use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::TransactionTrait;
use tracing::{info, instrument, warn};

use crate::error::{AppError, ErrorBody};
use crate::extractors::admin::WriteAccess;
use crate::extractors::json::AppJson;
use crate::extractors::path::IdPath;
use crate::extractors::query::AppQuery;
use crate::models::cheater::*;
use crate::state::AppState;
use crate::utils::cheater as store;

#[utoipa::path(
    get,
    path = "/",
    tag = "Cheaters",
    operation_id = "listCheaters",
    summary = "List cheaters",
    description = "Returns one page of cheater records ordered by `id` descending (most recent first). Defaults: `page=1`, `limit=50`. `page` below 1 is treated as 1 and `limit` is clamped to the configured maximum.",
    params(CheaterListQuery),
    responses(
        (status = 200, description = "Page of cheaters", body = CheaterListResponse),
        (status = 400, description = "Unparsable query (BAD_REQUEST)", body = ErrorBody),
        (status = 500, description = "Store failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_cheaters(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CheaterListQuery>,
) -> Result<Json<CheaterListResponse>, AppError> {
    let limits = &state.config.pagination;
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(limits.default_limit)
        .clamp(1, limits.max_limit.max(1));

    let offset = Pagination::new(0, page, limit).offset();
    let (rows, total) = store::list_cheaters(&state.db, offset, limit).await?;

    Ok(Json(CheaterListResponse {
        cheaters: rows.into_iter().map(CheaterResponse::from).collect(),
        pagination: Pagination::new(total, page, limit),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Cheaters",
    operation_id = "getCheater",
    summary = "Get a cheater with its evidence",
    params(("id" = i32, Path, description = "Cheater ID")),
    responses(
        (status = 200, description = "Cheater and evidence", body = CheaterDetailResponse),
        (status = 400, description = "Non-numeric ID (BAD_REQUEST)", body = ErrorBody),
        (status = 404, description = "Cheater or its evidence not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_cheater(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<CheaterDetailResponse>, AppError> {
    let cheater = store::find_cheater(&state.db, id).await?;

    let Some(evidence) = store::find_evidence(&state.db, &cheater.evidence).await? else {
        warn!(
            cheater_id = id,
            evidence_id = %cheater.evidence,
            "Cheater references missing evidence"
        );
        return Err(AppError::NotFound("Evidence not found for cheater".into()));
    };

    Ok(Json(CheaterDetailResponse {
        cheater: cheater.into(),
        evidence: evidence.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Cheaters",
    operation_id = "createCheater",
    summary = "Add a cheater and their evidence",
    description = "Writes the evidence record and then the cheater record in one transaction. When `cheater.id` is omitted the next free id (max + 1) is assigned. `cheater.evidence` defaults to `evidence.id`.",
    request_body = CreateCheaterRequest,
    responses(
        (status = 201, description = "Cheater created", body = CheaterMutationResponse),
        (status = 400, description = "Missing data (BAD_REQUEST) or invalid field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Admin credentials required (UNAUTHORIZED)", body = ErrorBody),
        (status = 409, description = "Cheater or evidence ID already exists (DUPLICATE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, access, payload))]
pub async fn create_cheater(
    access: WriteAccess,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCheaterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (new_cheater, new_evidence) = validate_create(payload)?;

    let txn = state.db.begin().await?;

    let id = match new_cheater.id {
        Some(id) => id,
        None => store::next_cheater_id(&txn).await?,
    };
    let now = chrono::Utc::now();

    let evidence = store::insert_evidence(&txn, new_evidence, now).await?;
    let cheater = store::insert_cheater(&txn, id, new_cheater, now).await?;

    txn.commit().await?;

    info!(
        cheater_id = cheater.id,
        evidence_id = %evidence.id,
        admin = access.username.as_deref().unwrap_or("-"),
        "Cheater added"
    );

    Ok((
        StatusCode::CREATED,
        Json(CheaterMutationResponse {
            message: "Cheater added successfully".into(),
            cheater: cheater.into(),
            evidence: Some(evidence.into()),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Cheaters",
    operation_id = "updateCheater",
    summary = "Update a cheater and/or its evidence",
    description = "Merges `cheater` into the cheater record, then merges `evidence` into the evidence it references (after any change to the reference). Neither record's id can be changed. Both writes share one transaction.",
    params(("id" = i32, Path, description = "Cheater ID")),
    request_body = UpdateCheaterRequest,
    responses(
        (status = 200, description = "Cheater updated", body = CheaterMutationResponse),
        (status = 400, description = "Non-numeric ID (BAD_REQUEST) or invalid field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Admin credentials required (UNAUTHORIZED)", body = ErrorBody),
        (status = 404, description = "Cheater not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Evidence already linked elsewhere (DUPLICATE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, access, payload))]
pub async fn update_cheater(
    access: WriteAccess,
    State(state): State<AppState>,
    IdPath(id): IdPath,
    AppJson(payload): AppJson<UpdateCheaterRequest>,
) -> Result<Json<CheaterMutationResponse>, AppError> {
    let cheater_changes = payload
        .cheater
        .as_ref()
        .map(|patch| validate_cheater_patch(patch, id))
        .transpose()?;

    let txn = state.db.begin().await?;

    let existing = store::find_cheater(&txn, id).await?;

    // The evidence patch applies to whatever the cheater links to after its own patch.
    let target_evidence = cheater_changes
        .as_ref()
        .and_then(|c| c.evidence.clone())
        .unwrap_or_else(|| existing.evidence.clone());
    let evidence_changes = payload
        .evidence
        .as_ref()
        .map(|patch| validate_evidence_patch(patch, &target_evidence))
        .transpose()?;

    let cheater = match cheater_changes {
        Some(changes) => store::update_cheater(&txn, existing, changes).await?,
        None => existing,
    };

    let current_evidence = store::find_evidence(&txn, &cheater.evidence).await?;
    let evidence = match (evidence_changes, current_evidence) {
        (Some(changes), Some(current)) => {
            Some(store::update_evidence(&txn, current, changes).await?)
        }
        (Some(_), None) => {
            warn!(
                cheater_id = id,
                evidence_id = %cheater.evidence,
                "Evidence patch skipped: referenced evidence is missing"
            );
            None
        }
        (None, current) => current,
    };

    txn.commit().await?;

    info!(
        cheater_id = id,
        admin = access.username.as_deref().unwrap_or("-"),
        "Cheater updated"
    );

    Ok(Json(CheaterMutationResponse {
        message: "Cheater updated successfully".into(),
        cheater: cheater.into(),
        evidence: evidence.map(EvidenceResponse::from),
    }))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Cheaters",
    operation_id = "deleteCheater",
    summary = "Delete a cheater and its evidence",
    description = "Deletes the cheater and then the evidence it references. A missing evidence record does not fail the call.",
    params(("id" = i32, Path, description = "Cheater ID")),
    responses(
        (status = 200, description = "Cheater deleted", body = MessageResponse),
        (status = 400, description = "Non-numeric ID (BAD_REQUEST)", body = ErrorBody),
        (status = 401, description = "Admin credentials required (UNAUTHORIZED)", body = ErrorBody),
        (status = 404, description = "Cheater not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, access))]
pub async fn delete_cheater(
    access: WriteAccess,
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    let txn = state.db.begin().await?;

    let cheater = store::find_cheater(&txn, id).await?;
    let evidence_id = cheater.evidence;

    store::delete_cheater(&txn, id).await?;
    if store::delete_evidence(&txn, &evidence_id).await? == 0 {
        warn!(cheater_id = id, evidence_id = %evidence_id, "Evidence already missing on delete");
    }

    txn.commit().await?;

    info!(
        cheater_id = id,
        admin = access.username.as_deref().unwrap_or("-"),
        "Cheater deleted"
    );

    Ok(Json(MessageResponse::new(
        "Cheater and associated evidence deleted successfully",
    )))
}
