//! `migrations create`: scaffold a new migration file.

use anyhow::{Context, Result};
use clap::Args;
use std::process::ExitCode;
use tracing::info;

use crate::adapters::sql::create_migration_file;
use crate::cli::commands::CommandContext;
use crate::cli::output::{file_line, output, CommandOutput};

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Name of the migration (e.g. create-users)
    #[arg(short, long)]
    pub name: String,
}

#[derive(Debug, serde::Serialize)]
pub struct CreateOutput {
    pub path: String,
}

impl CommandOutput for CreateOutput {
    fn to_human(&self) -> String {
        format!("New migration created\n{}", file_line(&self.path))
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: CreateArgs, context: &CommandContext) -> Result<ExitCode> {
    let path = create_migration_file(&context.migrations_path, &args.name)
        .await
        .with_context(|| format!("Failed to create migration {:?}", args.name))?;

    info!(path = %path.display(), "created migration file");
    output(
        &CreateOutput {
            path: path.display().to_string(),
        },
        context.json,
    );
    Ok(ExitCode::SUCCESS)
}
