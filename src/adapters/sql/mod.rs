//! sqlx-backed adapters for the migration runner and connection client
//! ports.

pub mod connection;
pub mod runner;
pub mod scaffold;
pub mod source;

pub use connection::{
    connect, create_pool, ConnectionError, PoolConfig, SqlBackend, SqlConnectionClient,
};
pub use runner::{SqlMigrationRunner, MIGRATIONS_TABLE};
pub use scaffold::{create_migration_file, ScaffoldError};
pub use source::{parse_migration, MigrationFile, MigrationSource};

use std::path::Path;

use crate::domain::models::ConnectionDescriptor;

/// Connect to the database and build a runner over `migrations_dir`.
///
/// The runner and the client share one pool; closing the client ends it.
pub async fn open(
    descriptor: &ConnectionDescriptor,
    migrations_dir: &Path,
) -> Result<(SqlMigrationRunner, SqlConnectionClient), ConnectionError> {
    let (pool, backend) = connect(descriptor).await?;
    let runner = SqlMigrationRunner::new(pool.clone(), backend, MigrationSource::new(migrations_dir));
    Ok((runner, SqlConnectionClient::new(pool)))
}
