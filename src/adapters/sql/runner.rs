//! SQL migration runner.
//!
//! Applied migrations are tracked by file name in `schema_migrations`. Each
//! migration runs in its own transaction together with its tracking row.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{AnyPool, Executor};
use std::collections::HashSet;
use tracing::{debug, warn};

use super::connection::SqlBackend;
use super::source::{MigrationFile, MigrationSource};
use crate::domain::errors::{DomainResult, RunnerError};
use crate::domain::models::{DownSelector, MigrationRecord};
use crate::domain::ports::MigrationRunner;

pub const MIGRATIONS_TABLE: &str = "schema_migrations";

pub struct SqlMigrationRunner {
    pool: AnyPool,
    backend: SqlBackend,
    source: MigrationSource,
}

impl SqlMigrationRunner {
    pub fn new(pool: AnyPool, backend: SqlBackend, source: MigrationSource) -> Self {
        Self {
            pool,
            backend,
            source,
        }
    }

    async fn ensure_migrations_table(&self) -> Result<(), RunnerError> {
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {MIGRATIONS_TABLE} (
                name VARCHAR(255) NOT NULL PRIMARY KEY,
                applied_at VARCHAR(64) NOT NULL
            )"
        ))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Names of applied migrations, in file-name order.
    async fn executed_names(&self) -> Result<Vec<String>, RunnerError> {
        self.ensure_migrations_table().await?;
        let rows: Vec<(String,)> = sqlx::query_as(&format!("SELECT name FROM {MIGRATIONS_TABLE}"))
            .fetch_all(&self.pool)
            .await?;

        let mut names: Vec<String> = rows.into_iter().map(|(name,)| name).collect();
        names.sort();
        Ok(names)
    }

    async fn pending_files(&self) -> Result<Vec<MigrationFile>, RunnerError> {
        let executed: HashSet<String> = self.executed_names().await?.into_iter().collect();
        let files = self.source.load().await?;
        Ok(files
            .into_iter()
            .filter(|m| !executed.contains(&m.file))
            .collect())
    }

    async fn apply_migration(&self, migration: &MigrationFile) -> Result<(), RunnerError> {
        debug!(migration = %migration.file, "applying migration");
        let execution_error = |e: sqlx::Error| RunnerError::Execution {
            migration: migration.file.clone(),
            message: e.to_string(),
        };

        let mut tx = self.pool.begin().await?;
        if !migration.up_sql.is_empty() {
            tx.execute(sqlx::raw_sql(&migration.up_sql))
                .await
                .map_err(execution_error)?;
        }
        sqlx::query(&format!(
            "INSERT INTO {MIGRATIONS_TABLE} (name, applied_at) VALUES ({}, {})",
            self.backend.placeholder(1),
            self.backend.placeholder(2)
        ))
        .bind(migration.file.clone())
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(execution_error)?;
        tx.commit().await.map_err(execution_error)?;
        Ok(())
    }

    async fn revert_migration(&self, migration: &MigrationFile) -> Result<(), RunnerError> {
        debug!(migration = %migration.file, "reverting migration");
        let execution_error = |e: sqlx::Error| RunnerError::Execution {
            migration: migration.file.clone(),
            message: e.to_string(),
        };

        let mut tx = self.pool.begin().await?;
        if migration.down_sql.is_empty() {
            warn!(migration = %migration.file, "migration has no down section, only untracking it");
        } else {
            tx.execute(sqlx::raw_sql(&migration.down_sql))
                .await
                .map_err(execution_error)?;
        }
        sqlx::query(&format!(
            "DELETE FROM {MIGRATIONS_TABLE} WHERE name = {}",
            self.backend.placeholder(1)
        ))
        .bind(migration.file.clone())
        .execute(&mut *tx)
        .await
        .map_err(execution_error)?;
        tx.commit().await.map_err(execution_error)?;
        Ok(())
    }

    /// Resolve the selector to migration files, checking each is executed.
    async fn select_for_revert(
        &self,
        selector: DownSelector,
    ) -> Result<Vec<MigrationFile>, RunnerError> {
        let executed = self.executed_names().await?;
        let names = match selector {
            DownSelector::Last => executed.last().cloned().into_iter().collect(),
            DownSelector::All => executed.iter().rev().cloned().collect(),
            DownSelector::Migrations(names) => names,
        };

        let files = self.source.load().await?;
        names
            .into_iter()
            .map(|name| {
                let file = files
                    .iter()
                    .find(|m| m.file == name)
                    .cloned()
                    .ok_or_else(|| RunnerError::MigrationNotFound(name.clone()))?;
                if !executed.contains(&name) {
                    return Err(RunnerError::NotExecuted(name));
                }
                Ok(file)
            })
            .collect()
    }
}

#[async_trait]
impl MigrationRunner for SqlMigrationRunner {
    async fn pending(&self) -> DomainResult<Vec<MigrationRecord>> {
        Ok(self
            .pending_files()
            .await?
            .into_iter()
            .map(|m| MigrationRecord::new(m.file))
            .collect())
    }

    async fn executed(&self) -> DomainResult<Vec<MigrationRecord>> {
        Ok(self
            .executed_names()
            .await?
            .into_iter()
            .map(MigrationRecord::new)
            .collect())
    }

    async fn up(&self) -> DomainResult<Vec<MigrationRecord>> {
        let mut applied = Vec::new();
        for migration in self.pending_files().await? {
            self.apply_migration(&migration).await?;
            applied.push(MigrationRecord::new(migration.file));
        }
        Ok(applied)
    }

    async fn down(&self, selector: DownSelector) -> DomainResult<Vec<MigrationRecord>> {
        let mut reverted = Vec::new();
        for migration in self.select_for_revert(selector).await? {
            self.revert_migration(&migration).await?;
            reverted.push(MigrationRecord::new(migration.file));
        }
        Ok(reverted)
    }
}
