pub mod config;
pub mod connection;
pub mod migration;

pub use config::{Config, CustomConfig, ProviderConfig, DEFAULT_MIGRATIONS_PATH};
pub use connection::{ConnectionDescriptor, ConnectionProperty, Dialect, CONNECTION_URL_KEY};
pub use migration::{BatchApplyFailure, BatchResult, DownSelector, ListStatus, MigrationRecord};
