use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{cheater, evidence};
use crate::error::AppError;

pub use super::shared::{MessageResponse, Pagination};
use super::shared::{lenient_id, optional_text, require_text};

/// Placeholder stored when no Codeforces handle is known.
pub const NO_CODEFORCES_ID: &str = "-";

/// Cheater fields as submitted by the admin panel.
///
/// Used for both creation (required fields checked by [`validate_create`])
/// and partial updates (absent fields are left untouched).
#[derive(Debug, Default, Deserialize, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheaterDraft {
    /// Omit on create to take the next free id.
    #[serde(default, deserialize_with = "lenient_id")]
    #[schema(value_type = Option<i32>, example = 1)]
    pub id: Option<i32>,
    /// Detection date, `YYYY-MM-DD`.
    #[schema(example = "2025-03-14")]
    pub date: Option<String>,
    #[schema(example = "https://codeforces.com/profile/tourist")]
    pub codeforces_id: Option<String>,
    #[schema(example = "tourist")]
    pub vjudge_id: Option<String>,
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    #[schema(example = "Eid Salami Contest")]
    pub contest: Option<String>,
    #[schema(example = "Permanent Ban")]
    pub punishment: Option<String>,
    /// Id of the linked evidence record. Defaults to the submitted evidence id.
    #[schema(example = "evidence_1")]
    pub evidence: Option<String>,
}

/// Evidence fields as submitted by the admin panel.
#[derive(Debug, Default, Deserialize, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceDraft {
    #[schema(example = "evidence_1")]
    pub id: Option<String>,
    #[schema(example = "Identical submissions in round 3")]
    pub title: Option<String>,
    #[schema(example = "https://codeforces.com/contest/1/submission/2")]
    pub submission_url: Option<String>,
    /// One entry per rendered paragraph.
    pub details: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateCheaterRequest {
    pub cheater: Option<CheaterDraft>,
    pub evidence: Option<EvidenceDraft>,
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateCheaterRequest {
    pub cheater: Option<CheaterDraft>,
    pub evidence: Option<EvidenceDraft>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CheaterListQuery {
    /// 1-based page number. Defaults to 1.
    pub page: Option<u64>,
    /// Page size. Defaults to 50.
    pub limit: Option<u64>,
}

/// A cheater ready to insert. `id` is `None` when it must be assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCheater {
    pub id: Option<i32>,
    pub date: NaiveDate,
    pub codeforces_id: String,
    pub vjudge_id: String,
    pub name: String,
    pub contest: String,
    pub punishment: String,
    pub evidence: String,
}

/// An evidence record ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvidence {
    pub id: String,
    pub title: String,
    pub submission_url: String,
    pub details: Vec<String>,
}

/// Validated cheater changes. `None` leaves a column as it is.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CheaterChanges {
    pub date: Option<NaiveDate>,
    pub codeforces_id: Option<String>,
    pub vjudge_id: Option<String>,
    pub name: Option<String>,
    pub contest: Option<String>,
    pub punishment: Option<String>,
    pub evidence: Option<String>,
}

/// Validated evidence changes. `None` leaves a column as it is.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EvidenceChanges {
    pub title: Option<String>,
    pub submission_url: Option<String>,
    pub details: Option<Vec<String>>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Date must be a valid YYYY-MM-DD date".into()))
}

fn validate_details(details: &[String]) -> Result<Vec<String>, AppError> {
    details
        .iter()
        .map(|d| {
            if d.trim().is_empty() {
                Err(AppError::Validation(
                    "Evidence details must not contain empty entries".into(),
                ))
            } else {
                Ok(d.clone())
            }
        })
        .collect()
}

fn normalize_codeforces_id(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NO_CODEFORCES_ID.to_string(),
    }
}

/// Check a create payload and split it into the two records to insert.
pub fn validate_create(payload: CreateCheaterRequest) -> Result<(NewCheater, NewEvidence), AppError> {
    let (Some(cheater), Some(evidence)) = (payload.cheater, payload.evidence) else {
        return Err(AppError::BadRequest(
            "Missing cheater or evidence data".into(),
        ));
    };

    let new_evidence = NewEvidence {
        id: require_text(evidence.id.as_deref(), "Evidence ID")?,
        title: require_text(evidence.title.as_deref(), "Evidence title")?,
        submission_url: require_text(evidence.submission_url.as_deref(), "Submission URL")?,
        details: validate_details(evidence.details.as_deref().unwrap_or_default())?,
    };

    if let Some(id) = cheater.id
        && id < 1
    {
        return Err(AppError::Validation("Cheater ID must be positive".into()));
    }

    let evidence_ref = match optional_text(cheater.evidence.as_deref(), "Evidence reference")? {
        None => new_evidence.id.clone(),
        Some(r) if r == new_evidence.id => r,
        Some(_) => {
            return Err(AppError::Validation(
                "Cheater evidence reference must match the evidence ID".into(),
            ));
        }
    };

    let new_cheater = NewCheater {
        id: cheater.id,
        date: parse_date(&require_text(cheater.date.as_deref(), "Date")?)?,
        codeforces_id: normalize_codeforces_id(cheater.codeforces_id.as_deref()),
        vjudge_id: require_text(cheater.vjudge_id.as_deref(), "VJudge ID")?,
        name: require_text(cheater.name.as_deref(), "Name")?,
        contest: require_text(cheater.contest.as_deref(), "Contest")?,
        punishment: require_text(cheater.punishment.as_deref(), "Punishment")?,
        evidence: evidence_ref,
    };

    Ok((new_cheater, new_evidence))
}

/// Check a cheater patch against the record it targets.
pub fn validate_cheater_patch(patch: &CheaterDraft, id: i32) -> Result<CheaterChanges, AppError> {
    if let Some(new_id) = patch.id
        && new_id != id
    {
        return Err(AppError::Validation("Cheater ID cannot be changed".into()));
    }

    Ok(CheaterChanges {
        date: patch.date.as_deref().map(parse_date).transpose()?,
        codeforces_id: patch
            .codeforces_id
            .as_deref()
            .map(|v| normalize_codeforces_id(Some(v))),
        vjudge_id: optional_text(patch.vjudge_id.as_deref(), "VJudge ID")?,
        name: optional_text(patch.name.as_deref(), "Name")?,
        contest: optional_text(patch.contest.as_deref(), "Contest")?,
        punishment: optional_text(patch.punishment.as_deref(), "Punishment")?,
        evidence: optional_text(patch.evidence.as_deref(), "Evidence reference")?,
    })
}

/// Check an evidence patch. Evidence ids never change once linked.
pub fn validate_evidence_patch(
    patch: &EvidenceDraft,
    evidence_id: &str,
) -> Result<EvidenceChanges, AppError> {
    if let Some(new_id) = patch.id.as_deref()
        && new_id.trim() != evidence_id
    {
        return Err(AppError::Validation("Evidence ID cannot be changed".into()));
    }

    Ok(EvidenceChanges {
        title: optional_text(patch.title.as_deref(), "Evidence title")?,
        submission_url: optional_text(patch.submission_url.as_deref(), "Submission URL")?,
        details: patch.details.as_deref().map(validate_details).transpose()?,
    })
}

/// Whether a punishment is shown with the permanent-ban badge.
pub fn is_permanent(punishment: &str) -> bool {
    punishment
        .trim_start()
        .get(..9)
        .is_some_and(|p| p.eq_ignore_ascii_case("permanent"))
}

/// Public view of a cheater record.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheaterResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "2025-03-14")]
    pub date: NaiveDate,
    #[schema(example = "-")]
    pub codeforces_id: String,
    #[schema(example = "tourist")]
    pub vjudge_id: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "Eid Salami Contest")]
    pub contest: String,
    #[schema(example = "Permanent Ban")]
    pub punishment: String,
    /// True when the punishment is a permanent ban.
    pub is_permanent: bool,
    #[schema(example = "evidence_1")]
    pub evidence: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<cheater::Model> for CheaterResponse {
    fn from(m: cheater::Model) -> Self {
        Self {
            is_permanent: is_permanent(&m.punishment),
            id: m.id,
            date: m.date,
            codeforces_id: m.codeforces_id,
            vjudge_id: m.vjudge_id,
            name: m.name,
            contest: m.contest,
            punishment: m.punishment,
            evidence: m.evidence,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Public view of an evidence record.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceResponse {
    #[schema(example = "evidence_1")]
    pub id: String,
    pub title: String,
    pub submission_url: String,
    pub details: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<evidence::Model> for EvidenceResponse {
    fn from(m: evidence::Model) -> Self {
        Self {
            details: details_from_json(&m.details),
            id: m.id,
            title: m.title,
            submission_url: m.submission_url,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Decode the stored details column, skipping anything that is not a string.
pub fn details_from_json(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CheaterListResponse {
    pub cheaters: Vec<CheaterResponse>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CheaterDetailResponse {
    pub cheater: CheaterResponse,
    pub evidence: EvidenceResponse,
}

/// Result of a create or update.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CheaterMutationResponse {
    #[schema(example = "Cheater added successfully")]
    pub message: String,
    pub cheater: CheaterResponse,
    /// `null` only when an update targets a cheater whose evidence is missing.
    pub evidence: Option<EvidenceResponse>,
}
