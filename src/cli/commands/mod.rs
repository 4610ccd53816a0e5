//! CLI command implementations.

pub mod create;
pub mod down;
pub mod list;
pub mod reset;
pub mod up;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::adapters::sql::{self, SqlConnectionClient, SqlMigrationRunner};
use crate::cli::output::{file_line, file_names, reverted_line, CommandOutput};
use crate::domain::models::{BatchResult, Config};
use crate::infrastructure::logging::redact_connection_url;
use crate::services::{ConnectionOptions, ConnectionResolver, Environment, MigrationController};

/// Controller type every database command runs on.
pub type SqlMigrationController = MigrationController<SqlMigrationRunner, SqlConnectionClient>;

/// Per-invocation connection overrides shared by the database commands.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionArgs {
    /// Database dialect (mysql, mariadb, postgres)
    #[arg(long = "dbDialect", value_name = "DIALECT")]
    pub db_dialect: Option<String>,

    /// Database host
    #[arg(long = "dbHost", value_name = "HOST")]
    pub db_host: Option<String>,

    /// Database port
    #[arg(long = "dbPort", value_name = "PORT")]
    pub db_port: Option<String>,

    /// Database name
    #[arg(long = "dbName", value_name = "NAME")]
    pub db_name: Option<String>,

    /// Database username
    #[arg(long = "dbUsername", value_name = "USERNAME")]
    pub db_username: Option<String>,

    /// Database password
    #[arg(long = "dbPassword", value_name = "PASSWORD")]
    pub db_password: Option<String>,
}

impl From<ConnectionArgs> for ConnectionOptions {
    fn from(args: ConnectionArgs) -> Self {
        Self {
            dialect: args.db_dialect,
            host: args.db_host,
            port: args.db_port,
            name: args.db_name,
            username: args.db_username,
            password: args.db_password,
        }
    }
}

/// Settings every command runs with, fixed once per process.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub migrations_path: PathBuf,
    pub environment: Environment,
    pub json: bool,
}

impl CommandContext {
    pub fn new<I>(config: &Config, path: Option<&Path>, process_environment: I, json: bool) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            migrations_path: config.migrations_path(path),
            environment: config.environment_snapshot(process_environment),
            json,
        }
    }

    /// Resolve the connection, connect, and hand back a controller for
    /// exactly one operation.
    pub async fn controller(&self, connection: ConnectionArgs) -> Result<SqlMigrationController> {
        let options = ConnectionOptions::from(connection);
        let descriptor = ConnectionResolver::resolve(&options, &self.environment)?;

        info!("Setting up connections...");
        debug!(
            url = %redact_connection_url(descriptor.connection_url()),
            migrations = %self.migrations_path.display(),
            "connecting"
        );

        let (runner, client) = sql::open(&descriptor, &self.migrations_path)
            .await
            .context("Failed to connect to the database")?;

        Ok(MigrationController::new(Arc::new(runner), Arc::new(client)))
    }
}

/// Result of an apply, revert or reset command.
#[derive(Debug, Serialize)]
pub struct BatchOutput {
    pub success: bool,
    pub migrations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failing: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reverted: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&BatchResult> for BatchOutput {
    fn from(result: &BatchResult) -> Self {
        let failure = result.failure.as_ref();
        Self {
            success: result.success,
            migrations: file_names(&result.migrations),
            failing: failure.and_then(|f| f.failing.as_ref()).map(|m| m.file.clone()),
            reverted: failure.map(|f| file_names(&f.reverted)).unwrap_or_default(),
            error: failure.map(ToString::to_string),
        }
    }
}

impl CommandOutput for BatchOutput {
    fn to_human(&self) -> String {
        let mut lines: Vec<String> = self.migrations.iter().map(|f| file_line(f)).collect();

        if let Some(ref error) = self.error {
            lines.push(error.clone());
        }
        lines.extend(self.reverted.iter().map(|f| reverted_line(f)));

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
