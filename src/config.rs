use dotenvy::dotenv;
use std::env;
use std::fmt;
use std::time::Duration;

use crate::errors::ConfigError;

const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_BACKFILL_DELAY_MS: u64 = 1000;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

// Keeps the password out of logs.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub backfill_delay: Duration, // pause between successive rate fetches
    pub http_timeout: Duration,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let database = DatabaseConfig {
            host: required("DB_HOST")?,
            port: parse_or(&lookup, "DB_PORT", DEFAULT_DB_PORT)?,
            user: required("DB_USER")?,
            password: required("DB_PASSWORD")?,
            database: required("DB_NAME")?,
        };

        let backfill_delay = Duration::from_millis(parse_or(
            &lookup,
            "BACKFILL_DELAY_MS",
            DEFAULT_BACKFILL_DELAY_MS,
        )?);
        let http_timeout = Duration::from_secs(parse_or(
            &lookup,
            "HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?);

        Ok(Config {
            database,
            backfill_delay,
            http_timeout,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
