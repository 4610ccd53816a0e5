//! Command-line interface for the `migrations` commands.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::domain::errors::{ConfigurationError, DomainError};
use commands::{create::CreateArgs, down::DownArgs, list::ListArgs, reset::ResetArgs, up::UpArgs};

pub use commands::CommandContext;

#[derive(Parser, Debug)]
#[command(name = "migrations")]
#[command(about = "Run SQL database migrations for a deployed service", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the migration files
    #[arg(short, long, global = true)]
    pub path: Option<PathBuf>,

    /// Log every SQL statement sent to the database
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Service definition file to read settings from
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new migration file
    Create(CreateArgs),
    /// Execute all pending migrations
    Up(UpArgs),
    /// Rollback one or more migrations
    Down(DownArgs),
    /// Rollback all migrations
    Reset(ResetArgs),
    /// Show a list of migrations
    List(ListArgs),
}

impl Commands {
    /// What the command was trying to do, for error reports.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Create(_) => "create migration",
            Self::Up(_) => "apply migrations",
            Self::Down(_) => "rollback migrations",
            Self::Reset(_) => "revert all migrations",
            Self::List(_) => "list migrations",
        }
    }
}

/// Message reported for a failed command.
///
/// Connection configuration problems are reported as-is; everything else
/// is prefixed with the action that failed.
pub fn error_message(err: &anyhow::Error, action: &str) -> String {
    let configuration = err.chain().find_map(|cause| {
        cause.downcast_ref::<ConfigurationError>().or_else(|| {
            match cause.downcast_ref::<DomainError>() {
                Some(DomainError::Configuration(inner)) => Some(inner),
                _ => None,
            }
        })
    });

    match configuration {
        Some(config_err) => config_err.to_string(),
        None => format!("Error trying to {action}: \n{err:#}"),
    }
}

/// Log a command failure and produce the process exit status.
pub fn handle_error(err: anyhow::Error, action: &str, json_mode: bool) -> ExitCode {
    let message = error_message(&err, action);
    tracing::error!("{message}");

    if json_mode {
        let body = serde_json::json!({ "success": false, "error": message });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    }

    ExitCode::FAILURE
}
