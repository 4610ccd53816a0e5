//! `migrations list`: show pending or executed migrations.

use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

use crate::cli::commands::{CommandContext, ConnectionArgs};
use crate::cli::output::{file_line, file_names, output, CommandOutput};
use crate::domain::models::ListStatus;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Status of the migrations to list (pending or executed)
    #[arg(short, long, default_value = "pending")]
    pub status: ListStatus,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Debug, serde::Serialize)]
pub struct ListOutput {
    pub status: ListStatus,
    pub migrations: Vec<String>,
    pub total: usize,
}

impl CommandOutput for ListOutput {
    fn to_human(&self) -> String {
        if self.migrations.is_empty() {
            return format!("No {} migrations", self.status);
        }

        let mut lines = vec![format!("{} {} migrations", self.total, self.status)];
        lines.extend(self.migrations.iter().map(|f| file_line(f)));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: ListArgs, context: &CommandContext) -> Result<ExitCode> {
    let controller = context.controller(args.connection).await?;
    let migrations = controller.list(args.status).await?;

    output(
        &ListOutput {
            status: args.status,
            total: migrations.len(),
            migrations: file_names(&migrations),
        },
        context.json,
    );
    Ok(ExitCode::SUCCESS)
}
