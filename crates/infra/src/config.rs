//! Configuration loading and representation.
//!
//! Both services are configured purely from the environment. Binaries call
//! `dotenvy::dotenv()` first so a local `.env` file can fill the gaps.

use std::time::Duration;

pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MIGRATIONS_PATH: &str = "migrations/products";
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 25;
pub const DEFAULT_DB_MIN_CONNECTIONS: u32 = 5;
pub const DEFAULT_DB_MAX_LIFETIME: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_DB_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
}

/// Settings for the products API process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductsConfig {
    pub database_url: String,
    pub rabbitmq_url: String,
    pub http_addr: String,
    pub migrations_path: String,
    pub shutdown_timeout: Duration,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_max_lifetime: Duration,
    pub db_acquire_timeout: Duration,
}

impl ProductsConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load_from(env_lookup)
    }

    /// Build from an arbitrary key lookup (empty values count as unset).
    pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let rabbitmq_url = get("RABBITMQ_URL").ok_or(ConfigError::Missing("RABBITMQ_URL"))?;

        Ok(Self {
            database_url,
            rabbitmq_url,
            http_addr: get("HTTP_ADDR").unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string()),
            migrations_path: get("MIGRATIONS_PATH")
                .unwrap_or_else(|| DEFAULT_MIGRATIONS_PATH.to_string()),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            db_min_connections: DEFAULT_DB_MIN_CONNECTIONS,
            db_max_lifetime: DEFAULT_DB_MAX_LIFETIME,
            db_acquire_timeout: DEFAULT_DB_ACQUIRE_TIMEOUT,
        })
    }
}

/// Settings for the notifications consumer process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationsConfig {
    pub rabbitmq_url: String,
    pub shutdown_timeout: Duration,
}

impl NotificationsConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load_from(env_lookup)
    }

    pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let rabbitmq_url = lookup("RABBITMQ_URL")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("RABBITMQ_URL"))?;

        Ok(Self {
            rabbitmq_url,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        })
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
