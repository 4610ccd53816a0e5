//! `migrations reset`: revert every executed migration.

use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

use crate::cli::commands::{BatchOutput, CommandContext, ConnectionArgs};
use crate::cli::output::output;

#[derive(Args, Debug)]
pub struct ResetArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

pub async fn execute(args: ResetArgs, context: &CommandContext) -> Result<ExitCode> {
    let controller = context.controller(args.connection).await?;
    let result = controller.reset().await?;

    output(&BatchOutput::from(&result), context.json);
    Ok(ExitCode::SUCCESS)
}
