//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - Service definition (YAML) loading
//! - Environment variable overrides
//! - Configuration validation

pub mod loader;

pub use loader::{
    process_environment, ConfigError, ConfigLoader, DEFAULT_SERVICE_FILE, ENV_PREFIX,
};
