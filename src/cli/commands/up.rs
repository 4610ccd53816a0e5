//! `migrations up`: apply every pending migration.

use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

use crate::cli::commands::{BatchOutput, CommandContext, ConnectionArgs};
use crate::cli::output::output;

#[derive(Args, Debug)]
pub struct UpArgs {
    /// Rollback the applied migrations of this batch if any of them fails
    #[arg(long)]
    pub rollback: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

pub async fn execute(args: UpArgs, context: &CommandContext) -> Result<ExitCode> {
    let controller = context.controller(args.connection).await?;
    let result = controller.apply(args.rollback).await?;

    output(&BatchOutput::from(&result), context.json);

    if result.success {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
