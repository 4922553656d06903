use std::net::SocketAddr;

use anyhow::Context;
use tracing::{Level, info};

use wall_server::config::AppConfig;
use wall_server::state::AppState;
use wall_server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load config")?;

    let level: Level = config
        .log
        .level
        .parse()
        .with_context(|| format!("Invalid log level '{}'", config.log.level))?;
    tracing_subscriber::fmt().with_max_level(level).init();

    let db = database::init_db(&config.database)
        .await
        .context("Failed to initialize database")?;
    info!("Database connected and schema synced");

    seed::ensure_default_admin(&db, &config.auth)
        .await
        .context("Failed to bootstrap default admin")?;

    if config.auth.require_admin_for_writes {
        info!("Record mutations require admin Basic credentials");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server host/port")?;

    let app = build_router(AppState { db, config });

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
