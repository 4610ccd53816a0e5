//! `migrations down`: revert executed migrations.

use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

use crate::cli::commands::{BatchOutput, CommandContext, ConnectionArgs};
use crate::cli::output::output;

#[derive(Args, Debug)]
pub struct DownArgs {
    /// Number of most recent migrations to revert
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    pub times: i64,

    /// Revert this migration only (takes precedence over --times)
    #[arg(short, long)]
    pub name: Option<String>,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

pub async fn execute(args: DownArgs, context: &CommandContext) -> Result<ExitCode> {
    let controller = context.controller(args.connection).await?;
    let result = controller.revert(args.times, args.name).await?;

    output(&BatchOutput::from(&result), context.json);
    Ok(ExitCode::SUCCESS)
}
