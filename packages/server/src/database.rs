use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};

use crate::config::DatabaseConfig;

/// Connect to the database and create any missing tables.
///
/// The returned connection is a pool; clone it into `AppState` and share it
/// for the lifetime of the process.
pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.to_owned());

    // Set connection pool options
    opt.max_connections(config.max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(config.sqlx_logging);

    let db = Database::connect(opt).await?;
    sync_schema(&db).await?;

    Ok(db)
}

/// Create or migrate the `admin`, `cheater` and `evidence` tables.
pub async fn sync_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.get_schema_registry("wall_server::entity::*")
        .sync(db)
        .await
}

/// Round-trip a trivial statement to confirm the pool can reach the database.
pub async fn ping<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    db.execute_unprepared("SELECT 1").await.map(|_| ())
}
