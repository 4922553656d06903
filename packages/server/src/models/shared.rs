use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// Pagination metadata included in list responses.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Total number of records across all pages.
    #[schema(example = 25)]
    pub total: u64,
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 50)]
    pub limit: u64,
    /// Total number of pages.
    #[schema(example = 1)]
    pub pages: u64,
}

impl Pagination {
    pub fn new(total: u64, page: u64, limit: u64) -> Self {
        Self {
            total,
            page,
            limit,
            pages: total.div_ceil(limit),
        }
    }

    /// Rows to skip before the first item of this page.
    ///
    /// Saturates at `i64::MAX`, the largest offset a database will bind, so
    /// a page far past the end yields an empty page.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(i64::MAX as u64)
    }
}

/// Generic `{message}` response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Cheater and associated evidence deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Accept an integer id given either as a JSON number or as a numeric string.
///
/// Admin forms tend to post ids straight from text inputs.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    let raw: Option<Raw> = Option::deserialize(deserializer)?;
    let value = match raw {
        None => return Ok(None),
        Some(Raw::Int(n)) => n,
        Some(Raw::Text(s)) if s.trim().is_empty() => return Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid id `{s}`")))?,
    };
    i32::try_from(value)
        .map(Some)
        .map_err(|_| serde::de::Error::custom(format!("id {value} is out of range")))
}

/// Trim a required text field, rejecting missing or blank values.
pub fn require_text(value: Option<&str>, label: &str) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::Validation(format!("{label} is required"))),
    }
}

/// Trim an optional patch field, rejecting present-but-blank values.
pub fn optional_text(value: Option<&str>, label: &str) -> Result<Option<String>, AppError> {
    match value {
        None => Ok(None),
        Some(v) => require_text(Some(v), label).map(Some),
    }
}
