//! Migration runner port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{DownSelector, MigrationRecord};

/// Repository-style interface over the ordered list of migration units and
/// their applied state.
#[async_trait]
pub trait MigrationRunner: Send + Sync {
    /// Migrations not yet applied, in apply order.
    async fn pending(&self) -> DomainResult<Vec<MigrationRecord>>;

    /// Migrations already applied, oldest first.
    async fn executed(&self) -> DomainResult<Vec<MigrationRecord>>;

    /// Apply every pending migration in order.
    ///
    /// Stops at the first failing migration; the ones applied before it stay
    /// applied.
    async fn up(&self) -> DomainResult<Vec<MigrationRecord>>;

    /// Revert the migrations picked by `selector`, returning them in the
    /// order they were reverted.
    async fn down(&self, selector: DownSelector) -> DomainResult<Vec<MigrationRecord>>;
}
