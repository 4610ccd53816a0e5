//! Domain layer for the migration commands
//!
//! This module contains the core models, error taxonomy and the ports the
//! services depend on.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{ConfigurationError, DomainError, DomainResult, RunnerError, ValidationError};
