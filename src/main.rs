//! `migrations` CLI entry point.

use clap::{CommandFactory, Parser};
use std::process::ExitCode;

use deploy_migrations::cli::commands::{create, down, list, reset, up};
use deploy_migrations::cli::{handle_error, Cli, CommandContext, Commands};
use deploy_migrations::infrastructure::config::{process_environment, ConfigLoader};
use deploy_migrations::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        return match Cli::command().print_help() {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        };
    };

    let config = match ConfigLoader::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading configuration: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let _logger = match LoggerImpl::init(&config.logging, cli.verbose) {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("Error initializing logging: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let context = CommandContext::new(
        &config,
        cli.path.as_deref(),
        process_environment(),
        cli.json,
    );
    let action = command.action();

    let result = match command {
        Commands::Create(args) => create::execute(args, &context).await,
        Commands::Up(args) => up::execute(args, &context).await,
        Commands::Down(args) => down::execute(args, &context).await,
        Commands::Reset(args) => reset::execute(args, &context).await,
        Commands::List(args) => list::execute(args, &context).await,
    };

    match result {
        Ok(code) => code,
        Err(err) => handle_error(err, action, cli.json),
    }
}
