//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `8080` |
//! | `DATABASE_URL` | `postgres://localhost/noteful` |
//! | `NOTEFUL_STORAGE` | `postgres` (or `memory`) |
//! | `DB_MAX_CONNECTIONS` | `10` |
//! | `ALLOWED_ORIGINS` | `http://localhost:3000` |
//! | `REQUEST_BODY_LIMIT` | `1048576` |
//!
//! Logging variables (`RUST_LOG`, `LOG_FORMAT`, `LOG_FILE`, `LOG_ANSI`) are
//! read directly by the binary.

use std::fmt::Display;
use std::str::FromStr;

use axum::http::HeaderValue;
use noteful_core::{Error, Result};
use noteful_db::pool::DEFAULT_MAX_CONNECTIONS;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/noteful";
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";
pub const DEFAULT_REQUEST_BODY_LIMIT: usize = 1024 * 1024;

/// Which repository backend serves requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(Error::Config(format!(
                "NOTEFUL_STORAGE must be `postgres` or `memory`, got {:?}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub storage: StorageBackend,
    pub db_max_connections: u32,
    /// CORS origin whitelist.
    pub allowed_origins: Vec<HeaderValue>,
    /// Maximum accepted request body in bytes.
    pub request_body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            storage: StorageBackend::default(),
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
            allowed_origins: parse_allowed_origins(DEFAULT_ALLOWED_ORIGINS),
            request_body_limit: DEFAULT_REQUEST_BODY_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which returns the raw value of a variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let origins = lookup("ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.into());

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT", defaults.port)?,
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            storage: parse_var(&lookup, "NOTEFUL_STORAGE", defaults.storage)?,
            db_max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            allowed_origins: parse_allowed_origins(&origins),
            request_body_limit: parse_var(&lookup, "REQUEST_BODY_LIMIT", defaults.request_body_limit)?,
        })
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("invalid {}={:?}: {}", key, raw, e))),
        _ => Ok(default),
    }
}

/// Parse a comma-separated origin list. Invalid entries are skipped with a warning.
///
/// ```text
/// ALLOWED_ORIGINS=https://notes.example.com,http://localhost:3000
/// ```
pub fn parse_allowed_origins(raw: &str) -> Vec<HeaderValue> {
    let origins: Vec<HeaderValue> = raw
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect();

    if origins.is_empty() {
        return vec![HeaderValue::from_static(DEFAULT_ALLOWED_ORIGINS)];
    }
    origins
}
