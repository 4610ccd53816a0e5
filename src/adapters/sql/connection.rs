//! Database connection pool management.

use async_trait::async_trait;
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::AnyPool;
use std::time::Duration;
use thiserror::Error;

use crate::domain::errors::{DomainResult, RunnerError};
use crate::domain::models::ConnectionDescriptor;
use crate::domain::ports::ConnectionClient;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Failed to create pool: {0}")]
    PoolCreationFailed(#[source] sqlx::Error),
    #[error("Unsupported dialect: {0}")]
    UnsupportedDialect(String),
}

impl From<ConnectionError> for RunnerError {
    fn from(err: ConnectionError) -> Self {
        match err {
            ConnectionError::UnsupportedDialect(dialect) => RunnerError::UnsupportedDialect(dialect),
            other => RunnerError::Connection(other.to_string()),
        }
    }
}

/// SQL flavour behind a pool, used where statements differ between drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlBackend {
    Postgres,
    MySql,
    Sqlite,
}

impl SqlBackend {
    /// Pick the backend from the URL scheme.
    pub fn from_url(database_url: &str) -> Result<Self, ConnectionError> {
        let scheme = database_url.split(':').next().unwrap_or_default();
        match scheme {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "mysql" | "mariadb" => Ok(Self::MySql),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(ConnectionError::UnsupportedDialect(other.to_string())),
        }
    }

    /// Bind parameter marker for the 1-based `index`.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Self::Postgres => format!("${index}"),
            Self::MySql | Self::Sqlite => "?".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        // Migrations run strictly one after another.
        Self {
            max_connections: 1,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// URL handed to the sqlx driver; MariaDB is served by the MySQL driver.
pub fn driver_url(database_url: &str) -> String {
    match database_url.strip_prefix("mariadb://") {
        Some(rest) => format!("mysql://{rest}"),
        None => database_url.to_string(),
    }
}

pub async fn create_pool(
    database_url: &str,
    config: Option<PoolConfig>,
) -> Result<(AnyPool, SqlBackend), ConnectionError> {
    let config = config.unwrap_or_default();
    let backend = SqlBackend::from_url(database_url)?;
    install_default_drivers();

    let pool = AnyPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&driver_url(database_url))
        .await
        .map_err(ConnectionError::PoolCreationFailed)?;

    Ok((pool, backend))
}

/// Open a pool for a resolved descriptor.
pub async fn connect(
    descriptor: &ConnectionDescriptor,
) -> Result<(AnyPool, SqlBackend), ConnectionError> {
    create_pool(descriptor.connection_url(), None).await
}

/// Connection client over a sqlx pool.
#[derive(Debug, Clone)]
pub struct SqlConnectionClient {
    pool: AnyPool,
}

impl SqlConnectionClient {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

#[async_trait]
impl ConnectionClient for SqlConnectionClient {
    async fn close(&self) -> DomainResult<()> {
        self.pool.close().await;
        Ok(())
    }
}
