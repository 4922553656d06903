use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Log every SQL statement through `tracing`.
    pub sqlx_logging: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Username of the administrator created when the admin table is empty.
    pub default_admin_username: String,
    /// Initial password of that administrator. Rotate it after first login.
    pub default_admin_password: String,
    /// Require HTTP Basic admin credentials on every record mutation.
    pub require_admin_for_writes: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaginationConfig {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 500,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub pagination: PaginationConfig,
    pub log: LogConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "sqlite://wall.db?mode=rwc")?
            .set_default("database.max_connections", 20)?
            .set_default("database.sqlx_logging", false)?
            .set_default("auth.default_admin_username", "admin")?
            .set_default("auth.default_admin_password", "wall-of-disgrace-admin")?
            .set_default("auth.require_admin_for_writes", false)?
            .set_default("pagination.default_limit", 50)?
            .set_default("pagination.max_limit", 500)?
            .set_default("log.level", "info")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., WALL__DATABASE__URL)
            .add_source(Environment::with_prefix("WALL").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
