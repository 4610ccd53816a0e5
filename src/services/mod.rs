pub mod connection_resolver;
pub mod migration_controller;

pub use connection_resolver::{ConnectionOptions, ConnectionResolver, Environment};
pub use migration_controller::MigrationController;
