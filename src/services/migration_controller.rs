//! Migration controller implementing the apply, revert, reset and list
//! commands on top of the runner and connection ports.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::errors::{DomainResult, ValidationError};
use crate::domain::models::{
    BatchApplyFailure, BatchResult, DownSelector, ListStatus, MigrationRecord,
};
use crate::domain::ports::{ConnectionClient, MigrationRunner};

/// Drives one migration operation over a runner and the connection it uses.
///
/// Every operation consumes the controller and closes the connection
/// exactly once before returning, whatever the outcome.
pub struct MigrationController<R: MigrationRunner, C: ConnectionClient> {
    runner: Arc<R>,
    client: Arc<C>,
}

impl<R: MigrationRunner, C: ConnectionClient> MigrationController<R, C> {
    pub fn new(runner: Arc<R>, client: Arc<C>) -> Self {
        Self { runner, client }
    }

    /// Apply all pending migrations.
    ///
    /// A rejected batch is reported through `success = false` rather than an
    /// error. With `revert_error` set, migrations from the batch that did get
    /// applied are rolled back.
    pub async fn apply(self, revert_error: bool) -> DomainResult<BatchResult> {
        let outcome = self.apply_pending(revert_error).await;
        self.release(outcome).await
    }

    /// Revert migrations, either the one named or the last `times` executed.
    pub async fn revert(self, times: i64, name: Option<String>) -> DomainResult<BatchResult> {
        let outcome = self.revert_migrations(times, name).await;
        self.release(outcome).await
    }

    /// Revert every executed migration.
    pub async fn reset(self) -> DomainResult<BatchResult> {
        let outcome = self.reset_all().await;
        self.release(outcome).await
    }

    /// List pending or executed migrations.
    pub async fn list(self, status: ListStatus) -> DomainResult<Vec<MigrationRecord>> {
        let outcome = self.list_migrations(status).await;
        self.release(outcome).await
    }

    async fn apply_pending(&self, revert_error: bool) -> DomainResult<BatchResult> {
        info!("Looking for pending migrations...");
        let pending = self.runner.pending().await?;

        if pending.is_empty() {
            info!("No pending migrations to apply");
            return Ok(BatchResult::succeeded(Vec::new()));
        }

        info!(count = pending.len(), "Applying pending migrations...");
        match self.runner.up().await {
            Ok(applied) => {
                info!("{} applied migrations", applied.len());
                Ok(BatchResult::succeeded(applied))
            }
            Err(err) => {
                warn!(error = %err, "Error while applying migrations");
                let failure = self.recover(&pending, revert_error, err.to_string()).await?;
                Ok(BatchResult::failed(failure))
            }
        }
    }

    async fn recover(
        &self,
        pending: &[MigrationRecord],
        revert_error: bool,
        cause: String,
    ) -> DomainResult<BatchApplyFailure> {
        info!("Looking for migration that has problems...");
        let executed = self.runner.executed().await?;
        let partially_applied = executed_from_pending(pending, &executed);
        let failing = locate_failing(pending, &partially_applied);

        if let Some(failing) = &failing {
            warn!("Something wrong with {failing}");
        }

        let mut reverted = Vec::new();
        if revert_error && !partially_applied.is_empty() {
            info!("Reverting applied migrations...");
            let selector = DownSelector::Migrations(
                partially_applied.iter().map(|m| m.file.clone()).collect(),
            );
            reverted = self.runner.down(selector).await?;
            for migration in &reverted {
                info!("reverted {migration}");
            }
        }

        Ok(BatchApplyFailure {
            failing,
            partially_applied,
            reverted,
            cause,
        })
    }

    async fn revert_migrations(&self, times: i64, name: Option<String>) -> DomainResult<BatchResult> {
        let name = name.filter(|n| !n.is_empty());
        if times < 1 && name.is_none() {
            return Err(ValidationError::InvalidRevertCount.into());
        }

        let reverted = if let Some(name) = name {
            info!("Trying to revert migration {name}");
            self.runner.down(DownSelector::Migrations(vec![name])).await?
        } else if times > 1 {
            info!("Trying to revert the last {times} migrations");
            let executed = self.runner.executed().await?;
            let selected = latest_first(executed, times);

            if selected.is_empty() {
                info!("There isn't migrations to revert");
                return Ok(BatchResult::succeeded(Vec::new()));
            }

            self.runner
                .down(DownSelector::Migrations(
                    selected.into_iter().map(|m| m.file).collect(),
                ))
                .await?
        } else {
            info!("Trying to revert the last migration");
            self.runner.down(DownSelector::Last).await?
        };

        info!("{} reverted migrations", reverted.len());
        Ok(BatchResult::succeeded(reverted))
    }

    async fn reset_all(&self) -> DomainResult<BatchResult> {
        info!("Trying to revert all migrations...");
        let reverted = self.runner.down(DownSelector::All).await?;
        info!("{} reverted migrations", reverted.len());
        Ok(BatchResult::succeeded(reverted))
    }

    async fn list_migrations(&self, status: ListStatus) -> DomainResult<Vec<MigrationRecord>> {
        info!("Searching for {status} migrations...");
        let migrations = match status {
            ListStatus::Pending => self.runner.pending().await?,
            ListStatus::Executed => self.runner.executed().await?,
        };
        info!("{} {status} migrations", migrations.len());
        Ok(migrations)
    }

    /// Close the connection and hand back the operation outcome.
    ///
    /// An operation error takes priority over a close error.
    async fn release<T>(self, outcome: DomainResult<T>) -> DomainResult<T> {
        let closed = self.client.close().await;
        match (outcome, closed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(close_err)) => Err(close_err),
            (Err(err), Err(close_err)) => {
                warn!(error = %close_err, "failed to close database connection");
                Err(err)
            }
            (Err(err), Ok(())) => Err(err),
        }
    }
}

/// Pending migrations that the runner now reports as executed, in pending order.
pub fn executed_from_pending(
    pending: &[MigrationRecord],
    executed: &[MigrationRecord],
) -> Vec<MigrationRecord> {
    let executed: HashSet<&str> = executed.iter().map(|m| m.file.as_str()).collect();
    pending
        .iter()
        .filter(|m| executed.contains(m.file.as_str()))
        .cloned()
        .collect()
}

/// Best-effort guess at the migration that broke a batch: the first pending
/// migration past the ones that made it in.
pub fn locate_failing(
    pending: &[MigrationRecord],
    partially_applied: &[MigrationRecord],
) -> Option<MigrationRecord> {
    pending.get(partially_applied.len()).cloned()
}

fn latest_first(mut executed: Vec<MigrationRecord>, times: i64) -> Vec<MigrationRecord> {
    executed.reverse();
    executed.truncate(usize::try_from(times).unwrap_or(usize::MAX));
    executed
}
