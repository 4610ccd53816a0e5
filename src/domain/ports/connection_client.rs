//! Connection client port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// A database connection owned by a single migration command.
#[async_trait]
pub trait ConnectionClient: Send + Sync {
    /// Release the connection. Calling it more than once must be harmless.
    async fn close(&self) -> DomainResult<()>;
}
