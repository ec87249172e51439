//! Service configuration loaded from environment variables.

use std::time::Duration;

pub const IDENTITY_DEFAULT_PORT: u16 = 50051;
pub const TRIP_DEFAULT_PORT: u16 = 50052;
pub const RESERVATION_DEFAULT_PORT: u16 = 50053;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Configuration shared by the three services.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: per service)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `json` for JSON lines, anything else for human-readable output
/// - `DATABASE_URL`: Postgres connection string; unset means an in-memory store
/// - `DB_MAX_CONNECTIONS`: pool size (default: `5`)
/// - `IDENTITY_SERVICE_URL`: identity service base URL (default: `http://localhost:50051`)
/// - `TRIP_SERVICE_URL`: trip service base URL (default: `http://localhost:50052`)
/// - `REMOTE_TIMEOUT_SECS`: request timeout for remote calls (default: none)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub identity_service_url: String,
    pub trip_service_url: String,
    pub remote_timeout: Option<Duration>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env(default_port: u16) -> Self {
        Self::from_lookup(default_port, |key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which returns the value of a
    /// variable if it is set.
    pub fn from_lookup(default_port: u16, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::with_port(default_port);

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: match lookup("LOG_FORMAT") {
                Some(format) if format.eq_ignore_ascii_case("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.db_max_connections),
            identity_service_url: lookup("IDENTITY_SERVICE_URL")
                .unwrap_or(defaults.identity_service_url),
            trip_service_url: lookup("TRIP_SERVICE_URL").unwrap_or(defaults.trip_service_url),
            remote_timeout: lookup("REMOTE_TIMEOUT_SECS")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }

    /// Returns the defaults for a service listening on `port`.
    pub fn with_port(port: u16) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            database_url: None,
            db_max_connections: 5,
            identity_service_url: format!("http://localhost:{IDENTITY_DEFAULT_PORT}"),
            trip_service_url: format!("http://localhost:{TRIP_DEFAULT_PORT}"),
            remote_timeout: None,
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
