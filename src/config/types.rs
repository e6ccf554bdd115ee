//! Service settings.

/// Settings read once at startup. See [`AppConfig::from_env`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    /// Upper bound for request bodies; doctor images are sent inline as base64.
    pub body_limit_bytes: usize,
    pub auto_migrate: bool,
    pub create_database: bool,
}

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/doctors";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 5 * 1024 * 1024;

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: DEFAULT_DATABASE_URL.into(),
            bind_addr: DEFAULT_BIND_ADDR.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            auto_migrate: true,
            create_database: true,
        }
    }
}
