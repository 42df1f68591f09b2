//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | `postgres://localhost/corpdir` |
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `3000` |
//! | `DB_MAX_CONNECTIONS` | `10` |
//! | `DB_CONNECT_TIMEOUT_SECS` | `30` |
//! | `DB_STATEMENT_TIMEOUT_MS` | `5000` (`0` disables) |
//! | `REQUEST_BODY_LIMIT_BYTES` | `2097152` |

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use corpdir_core::{Error, Result};
use corpdir_db::pool::{
    DEFAULT_ACQUIRE_TIMEOUT_SECS, DEFAULT_MAX_CONNECTIONS, DEFAULT_STATEMENT_TIMEOUT_MS,
};
use corpdir_db::PoolConfig;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/corpdir";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_REQUEST_BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

/// Runtime configuration of the API server.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub db_connect_timeout: Duration,
    /// `None` leaves the server default in place.
    pub db_statement_timeout: Option<Duration>,
    pub request_body_limit_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
            db_connect_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
            db_statement_timeout: Some(Duration::from_millis(DEFAULT_STATEMENT_TIMEOUT_MS)),
            request_body_limit_bytes: DEFAULT_REQUEST_BODY_LIMIT_BYTES,
        }
    }
}

impl ApiConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let statement_timeout_ms: u64 = parse_var(
            &lookup,
            "DB_STATEMENT_TIMEOUT_MS",
            DEFAULT_STATEMENT_TIMEOUT_MS,
        )?;

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT", defaults.port)?,
            db_max_connections: parse_var(
                &lookup,
                "DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,
            db_connect_timeout: Duration::from_secs(parse_var(
                &lookup,
                "DB_CONNECT_TIMEOUT_SECS",
                DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?),
            db_statement_timeout: (statement_timeout_ms > 0)
                .then(|| Duration::from_millis(statement_timeout_ms)),
            request_body_limit_bytes: parse_var(
                &lookup,
                "REQUEST_BODY_LIMIT_BYTES",
                defaults.request_body_limit_bytes,
            )?,
        })
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| Error::Config(format!("Invalid HOST/PORT '{}': {}", addr, e)))
    }

    /// Pool settings derived from this configuration.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new()
            .max_connections(self.db_max_connections)
            .acquire_timeout(self.db_connect_timeout)
            .statement_timeout(self.db_statement_timeout)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("{} has invalid value '{}': {}", key, raw, e))),
    }
}
