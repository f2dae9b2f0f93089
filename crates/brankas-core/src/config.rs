//! Configuration module
//!
//! Everything the service needs is read once from the process environment at
//! startup (a `.env` file is honored). The resulting [`Config`] is immutable and
//! shared read-only for the lifetime of the process.

use std::env;
use std::path::PathBuf;

use crate::constants::{DEFAULT_ALLOWED_CONTENT_TYPES, MAX_UPLOAD_SIZE, PERSISTENCE_TIMEOUT_SECS};

// Common constants
const SERVER_PORT: u16 = 8081;
const DATABASE_URL: &str = "postgresql://localhost:5432/brankas";
const MAX_CONNECTIONS: u32 = 10;
const CONNECT_TIMEOUT_SECS: u64 = 10;
const HEALTH_CHECK_INTERVAL_SECS: u64 = 30;
const STAGING_DIR: &str = "tmp";
const LANDING_PAGE: &str = "static/index.html";

/// Log output format for the tracing subscriber
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line (default)
    Json,
    /// Human readable single-line output
    Compact,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "compact" | "pretty" | "text" => LogFormat::Compact,
            _ => LogFormat::Json,
        }
    }
}

/// Application configuration.
#[derive(Clone)]
pub struct Config {
    pub server_port: u16,
    /// Shared secret expected in the `auth` form field. Empty means every upload is refused.
    pub token: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_connect_timeout_secs: u64,
    pub persistence_timeout_secs: u64,
    pub max_upload_size: usize,
    pub allowed_content_types: Vec<String>,
    pub staging_dir: PathBuf,
    pub landing_page: PathBuf,
    pub cors_origins: Vec<String>,
    /// Interval between background store probes. 0 = disabled.
    pub health_check_interval_secs: u64,
    pub log_format: LogFormat,
}

// Hand-written so the secret never ends up in logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server_port", &self.server_port)
            .field("token", &"<redacted>")
            .field("database_url", &redact_url(&self.database_url))
            .field("db_max_connections", &self.db_max_connections)
            .field("db_connect_timeout_secs", &self.db_connect_timeout_secs)
            .field("persistence_timeout_secs", &self.persistence_timeout_secs)
            .field("max_upload_size", &self.max_upload_size)
            .field("allowed_content_types", &self.allowed_content_types)
            .field("staging_dir", &self.staging_dir)
            .field("landing_page", &self.landing_page)
            .field("cors_origins", &self.cors_origins)
            .field("health_check_interval_secs", &self.health_check_interval_secs)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let allowed_content_types = env::var("ALLOWED_CONTENT_TYPES")
            .map(|s| split_list(&s))
            .unwrap_or_else(|_| {
                DEFAULT_ALLOWED_CONTENT_TYPES
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            });

        let cors_origins = split_list(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            token: env::var("TOKEN").unwrap_or_default(),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| DATABASE_URL.to_string()),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", MAX_CONNECTIONS),
            db_connect_timeout_secs: parse_or("DB_CONNECT_TIMEOUT_SECS", CONNECT_TIMEOUT_SECS),
            persistence_timeout_secs: parse_or("PERSISTENCE_TIMEOUT_SECS", PERSISTENCE_TIMEOUT_SECS),
            max_upload_size: parse_or("MAX_UPLOAD_SIZE", MAX_UPLOAD_SIZE),
            allowed_content_types,
            staging_dir: env::var("STAGING_DIR")
                .unwrap_or_else(|_| STAGING_DIR.to_string())
                .into(),
            landing_page: env::var("LANDING_PAGE")
                .unwrap_or_else(|_| LANDING_PAGE.to_string())
                .into(),
            cors_origins,
            health_check_interval_secs: parse_or(
                "HEALTH_CHECK_INTERVAL_SECS",
                HEALTH_CHECK_INTERVAL_SECS,
            ),
            log_format: LogFormat::parse(&env::var("LOG_FORMAT").unwrap_or_default()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Configuration with defaults and the given secret, for tests and tools.
    pub fn for_tests(token: impl Into<String>) -> Self {
        Config {
            server_port: 0,
            token: token.into(),
            database_url: DATABASE_URL.to_string(),
            db_max_connections: 1,
            db_connect_timeout_secs: 1,
            persistence_timeout_secs: PERSISTENCE_TIMEOUT_SECS,
            max_upload_size: MAX_UPLOAD_SIZE,
            allowed_content_types: DEFAULT_ALLOWED_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            staging_dir: env::temp_dir(),
            landing_page: LANDING_PAGE.into(),
            cors_origins: vec!["*".to_string()],
            health_check_interval_secs: 0,
            log_format: LogFormat::Compact,
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.max_upload_size == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE must be greater than zero"));
        }

        if self.persistence_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "PERSISTENCE_TIMEOUT_SECS must be greater than zero"
            ));
        }

        // An unreachable or exhausted pool must surface as a connect failure
        // before the persistence deadline can expire.
        if self.db_connect_timeout_secs > self.persistence_timeout_secs {
            return Err(anyhow::anyhow!(
                "DB_CONNECT_TIMEOUT_SECS must not exceed PERSISTENCE_TIMEOUT_SECS"
            ));
        }

        if self.db_max_connections == 0 {
            return Err(anyhow::anyhow!("DB_MAX_CONNECTIONS must be greater than zero"));
        }

        if self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_CONTENT_TYPES must list at least one content type"
            ));
        }

        Ok(())
    }

    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn max_upload_megabytes(&self) -> usize {
        self.max_upload_size / 1024 / 1024
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_or<T: std::str::FromStr + ToString + Copy>(key: &str, default: T) -> T {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or(default)
}

/// Strip the password out of a connection string before it is printed.
fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            let credentials = &url[scheme_end + 3..at];
            match credentials.find(':') {
                Some(colon) => format!(
                    "{}{}:***{}",
                    &url[..scheme_end + 3],
                    &credentials[..colon],
                    &url[at..]
                ),
                None => url.to_string(),
            }
        }
        _ => url.to_string(),
    }
}
