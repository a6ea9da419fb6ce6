//! webassess -- cloud architecture assessment CLI
//!
//! Resolves the architecture behind a public endpoint, rates its availability,
//! estimates its cost, benchmarks it and records the result.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use colored::Colorize;
use tracing::error;
use webassess_core::config::{AssessConfig, GeneralConfig};

use crate::cli::Cli;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let general = logging_config(&cli).await;
    if let Err(e) = logging::init_tracing(&general) {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(2);
    }
    webassess_core::metrics::describe_all();

    let writer = OutputWriter::new(cli.output);
    if let Err(e) = commands::dispatch(cli, &writer).await {
        error!(error = %e, exit_code = e.exit_code(), "command failed");
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(e.exit_code());
    }
}

/// Logging settings from the config file, falling back to defaults when the
/// file is invalid so that `config validate` can still report the problem.
async fn logging_config(cli: &Cli) -> GeneralConfig {
    let mut general = AssessConfig::load_or_default(&cli.config)
        .await
        .map(|config| config.general)
        .unwrap_or_default();
    if let Some(level) = &cli.log_level {
        general.log_level = level.clone();
    }
    general
}
