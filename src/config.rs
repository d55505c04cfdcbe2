// config.rs

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use dotenv::dotenv;
use thiserror::Error;

use crate::database::init::DbConfig;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Error when required environment variable is not found
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: String, value: String },
}

/// Process configuration assembled from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db: DbConfig,
    /// Optional upper bound on the whole bootstrap
    pub bootstrap_timeout: Option<Duration>,
    pub request_timeout: Duration,
    pub server_addr: SocketAddr,
}

impl AppConfig {
    /// Loads `.env` (if any) and reads the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = DbConfig::default();

        let db = DbConfig {
            max_pool_size: parse_or(&lookup, "PG_MAX_POOL_SIZE", defaults.max_pool_size)?,
            conn_attempts: parse_or(&lookup, "PG_CONN_ATTEMPTS", defaults.conn_attempts)?,
            conn_attempt_delay: Duration::from_millis(parse_or(
                &lookup,
                "PG_CONN_ATTEMPT_DELAY_MS",
                defaults.conn_attempt_delay.as_millis() as u64,
            )?),
            acquire_timeout: Duration::from_millis(parse_or(
                &lookup,
                "PG_ACQUIRE_TIMEOUT_MS",
                defaults.acquire_timeout.as_millis() as u64,
            )?),
        };

        let bootstrap_timeout = match lookup("PG_BOOTSTRAP_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(parse("PG_BOOTSTRAP_TIMEOUT_SECS", &raw)?)),
            None => None,
        };

        Ok(Self {
            database_url: database_url(&lookup)?,
            db,
            bootstrap_timeout,
            request_timeout: Duration::from_millis(parse_or(&lookup, "REQUEST_TIMEOUT_MS", 10_000)?),
            server_addr: parse_or(&lookup, "SERVER_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
        })
    }
}

/// `DATABASE_URL` wins; otherwise the URL is built from the POSTGRES_* parts.
fn database_url<F>(lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("DATABASE_URL") {
        return Ok(url);
    }

    let var = |key: &str| lookup(key).ok_or_else(|| ConfigError::EnvVarNotFound(key.to_string()));
    Ok(format!(
        "postgres://{}:{}@{}:{}/{}",
        var("POSTGRES_USER")?,
        var("POSTGRES_PASSWORD")?,
        var("POSTGRES_HOST")?,
        var("POSTGRES_PORT")?,
        var("POSTGRES_DB")?,
    ))
}

fn parse<T: FromStr>(var: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        var: var.to_string(),
        value: raw.to_string(),
    })
}

fn parse_or<F, T>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(raw) => parse(var, &raw),
        None => Ok(default),
    }
}
