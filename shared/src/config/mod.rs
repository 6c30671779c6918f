//! Environment-driven settings shared by every deployment.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file. Missing required settings are fatal at startup.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use crate::database::{RetryPolicy, DEFAULT_MAX_BACKOFF};
use crate::error::ConfigError;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Connection descriptor for the relational store.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

// Keep the password out of logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub env: String,
    pub log_level: String,
    pub database: DatabaseConfig,
    pub retry_duration: Duration,
    pub max_backoff: Duration,
}

impl Config {
    /// Loads `.env` (if present) and then reads the environment.
    pub fn load() -> Result<Self, ConfigError> {
        if dotenv::dotenv().is_ok() {
            tracing::debug!("Loaded settings from .env file");
        }
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let database = DatabaseConfig {
            host: required("DATABASE_HOST")?,
            port: parse_required("DATABASE_PORT")?,
            user: required("DATABASE_USER")?,
            password: required("DATABASE_PASSWORD")?,
            name: required("DATABASE_NAME")?,
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
        };

        let max_backoff_ms = parse_or(
            "DATABASE_MAX_BACKOFF_MILLISECONDS",
            DEFAULT_MAX_BACKOFF.as_millis() as u64,
        )?;

        Ok(Self {
            env: required("ENV")?,
            log_level: required("LOG_LEVEL")?,
            database,
            retry_duration: Duration::from_secs(parse_required("DATABASE_RETRY_DURATION_SECONDS")?),
            max_backoff: Duration::from_millis(max_backoff_ms),
        })
    }

    /// Connection descriptor for the store.
    pub fn database(&self) -> &DatabaseConfig {
        &self.database
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_duration).with_max_backoff(self.max_backoff)
    }
}

/// Extra settings for the standalone HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub domain: String,
    pub port: u16,
    pub shutdown_duration: Duration,
    pub request_timeout: Duration,
    pub register_health_route: bool,
}

impl HttpConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            domain: env::var("HTTP_DOMAIN").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("HTTP_PORT", 8080)?,
            shutdown_duration: Duration::from_secs(parse_or("HTTP_SHUTDOWN_DURATION_SECONDS", 10)?),
            request_timeout: Duration::from_millis(parse_or(
                "HTTP_REQUEST_TIMEOUT_MILLISECONDS",
                5_000,
            )?),
            register_health_route: parse_or("HTTP_REGISTER_HEALTH_ROUTE", true)?,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.domain, self.port)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parse_required<T>(name: &'static str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    parse(name, required(name)?)
}

fn parse_or<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(value) if !value.is_empty() => parse(name, value),
        _ => Ok(default),
    }
}

fn parse<T>(name: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match value.trim().parse::<T>() {
        Ok(parsed) => Ok(parsed),
        Err(err) => Err(ConfigError::Invalid {
            name,
            reason: err.to_string(),
            value,
        }),
    }
}
