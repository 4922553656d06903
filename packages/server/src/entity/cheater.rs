use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cheater")]
pub struct Model {
    /// Assigned by the caller or as `max(id) + 1`.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    /// Date the violation was detected.
    pub date: Date,
    pub codeforces_id: String,
    pub vjudge_id: String,
    pub name: String,
    pub contest: String,
    pub punishment: String,

    /// `evidence.id` of the linked record. Kept as a plain column so a missing
    /// evidence row does not block reads or deletes.
    #[sea_orm(unique)]
    pub evidence: String,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
