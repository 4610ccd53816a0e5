//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the async trait interfaces the migration controller
//! drives and infrastructure adapters implement:
//! - MigrationRunner: ordered, persisted migration state
//! - ConnectionClient: the database connection the runner works over
//!
//! Keeping these as traits lets the controller be exercised without a
//! database.

pub mod connection_client;
pub mod migration_runner;

pub use connection_client::ConnectionClient;
pub use migration_runner::MigrationRunner;
