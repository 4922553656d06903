use sea_orm::*;
use tracing::{info, warn};

use crate::config::AuthConfig;
use crate::entity::admin;
use crate::utils::hash;

/// Create the default administrator if the admin table is empty.
///
/// Runs once at startup, before the listener is bound. Two processes racing
/// through this both insert with `ON CONFLICT DO NOTHING`, so the loser sees
/// `RecordNotInserted` and treats the table as already bootstrapped.
/// Returns `true` when this call created the admin.
pub async fn ensure_default_admin(db: &DatabaseConnection, auth: &AuthConfig) -> Result<bool, DbErr> {
    if admin::Entity::find().count(db).await? > 0 {
        return Ok(false);
    }

    let hashed = hash::hash_password(&auth.default_admin_password)
        .map_err(|e| DbErr::Custom(format!("Password hash error: {e}")))?;
    let now = chrono::Utc::now();

    let model = admin::ActiveModel {
        username: Set(auth.default_admin_username.trim().to_string()),
        salt: Set(hashed.salt),
        hashed_password: Set(hashed.hashed_password),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let result = admin::Entity::insert(model)
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(admin::Column::Username)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(0) | Err(DbErr::RecordNotInserted) => {
            info!("Default admin already bootstrapped by another process");
            Ok(false)
        }
        Ok(_) => {
            warn!(
                username = %auth.default_admin_username,
                "Created default admin with the configured initial password; change it now"
            );
            Ok(true)
        }
        Err(e) => Err(e),
    }
}
