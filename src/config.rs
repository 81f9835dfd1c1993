use std::time::Duration;

use crate::errors::AppError;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the order store, passed explicitly to [`crate::connect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub connection_timeout: Duration,
}

impl StoreConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connection_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Read `DATABASE_URL`, `DB_MAX_CONNECTIONS` and `DB_CONNECT_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .ok_or_else(|| AppError::Config("DATABASE_URL must be set".to_string()))?;

        let mut config = Self::new(database_url);

        if let Some(raw) = lookup("DB_MAX_CONNECTIONS") {
            config.max_connections = match raw.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(AppError::Config(format!(
                        "DB_MAX_CONNECTIONS must be a positive number, got {raw:?}"
                    )))
                }
            };
        }

        if let Some(raw) = lookup("DB_CONNECT_TIMEOUT_SECS") {
            let secs = raw.parse::<u64>().map_err(|_| {
                AppError::Config(format!(
                    "DB_CONNECT_TIMEOUT_SECS must be a number, got {raw:?}"
                ))
            })?;
            config.connection_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
