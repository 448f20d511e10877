use crate::error::SqlxErrorExt;
use serde::Deserialize;
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::AnyPool;
use std::sync::Once;
use std::time::Duration;
use tabula::{DataError, Dialect};

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    30
}

/// Connection configuration for the backing database.
///
/// Deserializable from any serde source; [`DatabaseConfig::from_env`] covers
/// the common case of a `DATABASE_URL` environment variable (with a `.env`
/// overlay).
///
/// ```ignore
/// let config = DatabaseConfig::from_env()?;
/// let pool = config.connect().await?;
/// let manager = SqlxManager::<Account>::new(pool, config.dialect())?;
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL, e.g. `postgres://localhost/app`.
    pub url: String,
    /// Connection pool size (default: 10).
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// How long an operation may wait for a pooled connection (default: 30s).
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }

    /// Build a config from `DATABASE_URL`, loading a `.env` file first when
    /// one is present.
    pub fn from_env() -> Result<Self, DataError> {
        dotenvy::dotenv().ok();
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| DataError::precondition("DATABASE_URL is not set"))?;
        Ok(Self::new(url))
    }

    /// The SQL dialect implied by the URL scheme.
    pub fn dialect(&self) -> Dialect {
        Dialect::for_url(&self.url)
    }

    /// Open the connection pool. Drivers are installed once per process.
    pub async fn connect(&self) -> Result<AnyPool, DataError> {
        install_drivers();
        AnyPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .connect(&self.url)
            .await
            .map_err(|e| e.into_data_error())
    }
}

static DRIVERS: Once = Once::new();

/// Register the compiled-in sqlx drivers with the Any driver. Idempotent.
pub fn install_drivers() {
    DRIVERS.call_once(install_default_drivers);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_on_deserialize() {
        let config: DatabaseConfig =
            serde_json::from_str(r#"{"url": "sqlite::memory:"}"#).unwrap();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.acquire_timeout_secs, 30);
        assert_eq!(config.dialect(), Dialect::Sqlite);
    }

    #[test]
    fn test_dialect_sniffing() {
        assert_eq!(
            DatabaseConfig::new("postgres://localhost/app").dialect(),
            Dialect::Postgres
        );
        assert_eq!(
            DatabaseConfig::new("mysql://localhost/app").dialect(),
            Dialect::MySql
        );
    }
}
