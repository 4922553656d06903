//! Persistence helpers for cheater and evidence records.
//!
//! Every function is generic over `ConnectionTrait` so handlers can run them
//! on the pool or inside a transaction.

use chrono::{DateTime, Utc};
use sea_orm::*;

use crate::entity::{cheater, evidence};
use crate::error::AppError;
use crate::models::cheater::{CheaterChanges, EvidenceChanges, NewCheater, NewEvidence};

/// Look up a cheater by ID, returning 404 if not found.
pub async fn find_cheater<C: ConnectionTrait>(db: &C, id: i32) -> Result<cheater::Model, AppError> {
    cheater::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Cheater not found".into()))
}

/// Find the cheater that links to the given evidence record, if any.
pub async fn find_cheater_by_evidence<C: ConnectionTrait>(
    db: &C,
    evidence_id: &str,
) -> Result<Option<cheater::Model>, AppError> {
    Ok(cheater::Entity::find()
        .filter(cheater::Column::Evidence.eq(evidence_id))
        .one(db)
        .await?)
}

pub async fn find_evidence<C: ConnectionTrait>(
    db: &C,
    id: &str,
) -> Result<Option<evidence::Model>, AppError> {
    Ok(evidence::Entity::find_by_id(id.to_string()).one(db).await?)
}

/// One page of cheaters, newest id first, plus the total row count.
pub async fn list_cheaters<C: ConnectionTrait>(
    db: &C,
    offset: u64,
    limit: u64,
) -> Result<(Vec<cheater::Model>, u64), AppError> {
    let total = cheater::Entity::find().count(db).await?;

    let items = cheater::Entity::find()
        .order_by_desc(cheater::Column::Id)
        .offset(Some(offset))
        .limit(Some(limit))
        .all(db)
        .await?;

    Ok((items, total))
}

/// One greater than the current maximum id, or 1 for an empty table.
pub async fn next_cheater_id<C: ConnectionTrait>(db: &C) -> Result<i32, AppError> {
    let max_id: Option<i32> = cheater::Entity::find()
        .select_only()
        .column_as(cheater::Column::Id.max(), "max_id")
        .into_tuple::<Option<i32>>()
        .one(db)
        .await?
        .flatten();
    max_id
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| AppError::Validation("Cheater ID overflow".into()))
}

pub async fn insert_evidence<C: ConnectionTrait>(
    db: &C,
    new: NewEvidence,
    now: DateTime<Utc>,
) -> Result<evidence::Model, AppError> {
    if find_evidence(db, &new.id).await?.is_some() {
        return Err(AppError::Duplicate(
            "Evidence with this ID already exists".into(),
        ));
    }

    let model = evidence::ActiveModel {
        id: Set(new.id),
        title: Set(new.title),
        submission_url: Set(new.submission_url),
        details: Set(serde_json::Value::from(new.details)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    Ok(model.insert(db).await?)
}

/// Insert a cheater whose id has already been assigned.
pub async fn insert_cheater<C: ConnectionTrait>(
    db: &C,
    id: i32,
    new: NewCheater,
    now: DateTime<Utc>,
) -> Result<cheater::Model, AppError> {
    if cheater::Entity::find_by_id(id).one(db).await?.is_some() {
        return Err(AppError::Duplicate(
            "A cheater with this ID already exists".into(),
        ));
    }
    if find_cheater_by_evidence(db, &new.evidence).await?.is_some() {
        return Err(AppError::Duplicate(
            "Evidence is already linked to another cheater".into(),
        ));
    }

    let model = cheater::ActiveModel {
        id: Set(id),
        date: Set(new.date),
        codeforces_id: Set(new.codeforces_id),
        vjudge_id: Set(new.vjudge_id),
        name: Set(new.name),
        contest: Set(new.contest),
        punishment: Set(new.punishment),
        evidence: Set(new.evidence),
        created_at: Set(now),
        updated_at: Set(now),
    };

    Ok(model.insert(db).await?)
}

/// Apply validated changes to a cheater. Re-pointing `evidence` requires the
/// target to exist and be unlinked.
pub async fn update_cheater<C: ConnectionTrait>(
    db: &C,
    existing: cheater::Model,
    changes: CheaterChanges,
) -> Result<cheater::Model, AppError> {
    if changes == CheaterChanges::default() {
        return Ok(existing);
    }

    if let Some(ref target) = changes.evidence
        && *target != existing.evidence
    {
        if find_evidence(db, target).await?.is_none() {
            return Err(AppError::Validation(format!(
                "Evidence '{target}' does not exist"
            )));
        }
        if find_cheater_by_evidence(db, target).await?.is_some() {
            return Err(AppError::Duplicate(
                "Evidence is already linked to another cheater".into(),
            ));
        }
    }

    let mut active: cheater::ActiveModel = existing.into();
    if let Some(date) = changes.date {
        active.date = Set(date);
    }
    if let Some(v) = changes.codeforces_id {
        active.codeforces_id = Set(v);
    }
    if let Some(v) = changes.vjudge_id {
        active.vjudge_id = Set(v);
    }
    if let Some(v) = changes.name {
        active.name = Set(v);
    }
    if let Some(v) = changes.contest {
        active.contest = Set(v);
    }
    if let Some(v) = changes.punishment {
        active.punishment = Set(v);
    }
    if let Some(v) = changes.evidence {
        active.evidence = Set(v);
    }
    active.updated_at = Set(Utc::now());

    Ok(active.update(db).await?)
}

pub async fn update_evidence<C: ConnectionTrait>(
    db: &C,
    existing: evidence::Model,
    changes: EvidenceChanges,
) -> Result<evidence::Model, AppError> {
    if changes == EvidenceChanges::default() {
        return Ok(existing);
    }

    let mut active: evidence::ActiveModel = existing.into();
    if let Some(v) = changes.title {
        active.title = Set(v);
    }
    if let Some(v) = changes.submission_url {
        active.submission_url = Set(v);
    }
    if let Some(v) = changes.details {
        active.details = Set(serde_json::Value::from(v));
    }
    active.updated_at = Set(Utc::now());

    Ok(active.update(db).await?)
}

/// Delete a cheater row. Returns the number of rows removed.
pub async fn delete_cheater<C: ConnectionTrait>(db: &C, id: i32) -> Result<u64, AppError> {
    let res = cheater::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected)
}

/// Delete an evidence row. Returns the number of rows removed.
pub async fn delete_evidence<C: ConnectionTrait>(db: &C, id: &str) -> Result<u64, AppError> {
    let res = evidence::Entity::delete_by_id(id.to_string())
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
