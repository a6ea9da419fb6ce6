//! Command handlers -- one module per subcommand

pub mod config;
pub mod history;
pub mod resolve;
pub mod run;

use webassess_architecture::{ArchitectureReport, Assessor};
use webassess_core::config::AssessConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

/// Route the parsed command line to its handler.
pub async fn dispatch(cli: Cli, writer: &OutputWriter) -> Result<(), CliError> {
    match cli.command {
        Commands::Run(args) => run::execute(args, &cli.config, writer).await,
        Commands::Resolve(args) => resolve::execute(args, &cli.config, writer).await,
        Commands::History(args) => history::execute(args, &cli.config, writer).await,
        Commands::Config(args) => config::execute(args, &cli.config, writer).await,
    }
}

/// Resolve and rate the configured target against the live cloud API.
async fn assess_target(config: &AssessConfig) -> Result<ArchitectureReport, CliError> {
    let assessor = Assessor::from_config(config).await?;
    let report = assessor
        .assess(&config.target.project_id, &config.target.endpoint)
        .await?;
    Ok(report)
}
