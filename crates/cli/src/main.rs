mod cli;
mod config;
mod dashboard;
mod error;
mod fetch;
mod panel;
mod query;
mod records;
mod selection;
mod session;
mod years;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use cli::Commands;
use tracing_subscriber::EnvFilter;

use crate::dashboard::dashboard;
use crate::error::CliError;
use crate::query::query;
use crate::records::records;
use crate::years::years;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Dashboard(args) => dashboard(config, args),
        Commands::Records(args) => records(config, args),
        Commands::Years(args) => years(config, args),
        Commands::Query(args) => query(config, args),
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
