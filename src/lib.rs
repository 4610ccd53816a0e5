//! Database migration commands for services deployed with a
//! serverless-style service definition.
//!
//! The `migrations` binary resolves one database connection from CLI flags,
//! the service's `provider.environment` and the process environment, then
//! runs SQL migration files against it.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors, and the runner and
//!   connection ports
//! - **Service Layer** (`services`): connection resolution and the batch
//!   migration controller
//! - **Adapters** (`adapters`): sqlx implementations of the ports
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use deploy_migrations::adapters::sql;
//! use deploy_migrations::services::{ConnectionOptions, ConnectionResolver, MigrationController};
//!
//! let descriptor = ConnectionResolver::resolve(&ConnectionOptions::default(), &environment)?;
//! let (runner, client) = sql::open(&descriptor, "./migrations".as_ref()).await?;
//! let result = MigrationController::new(Arc::new(runner), Arc::new(client))
//!     .apply(true)
//!     .await?;
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{ConfigurationError, DomainError, DomainResult, RunnerError, ValidationError};
pub use domain::models::{
    BatchApplyFailure, BatchResult, Config, ConnectionDescriptor, ConnectionProperty, DownSelector,
    ListStatus, MigrationRecord,
};
pub use domain::ports::{ConnectionClient, MigrationRunner};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ConnectionOptions, ConnectionResolver, Environment, MigrationController};
