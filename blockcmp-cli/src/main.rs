//! blockcmp -- per-block timing comparison between Bitcoin Core and bitcrust logs.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use colored::Colorize;

use blockcmp_core::config::{BlockcmpConfig, GeneralConfig};

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Commands surface config errors themselves; logging only needs [general].
    let mut general = match BlockcmpConfig::load_or_default(&cli.config).await {
        Ok(config) => config.general,
        Err(_) => GeneralConfig::default(),
    };
    if let Some(level) = cli.log_level.clone() {
        general.log_level = level;
    }
    logging::init_tracing(&general)?;

    let writer = OutputWriter::new(cli.output);

    if let Err(e) = run(cli, &writer).await {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(e.exit_code());
    }

    Ok(())
}

async fn run(cli: Cli, writer: &OutputWriter) -> Result<(), CliError> {
    let config_path = cli.config.as_path();
    tracing::debug!(config = %config_path.display(), output = ?writer.format(), "dispatching command");
    match cli.command {
        Commands::Compare(args) => commands::compare::execute(args, config_path, writer).await,
        Commands::Extract(args) => commands::extract::execute(args, config_path, writer).await,
        Commands::Profile(args) => commands::profile::execute(args, config_path, writer).await,
        Commands::Config(args) => commands::config::execute(args, config_path, writer).await,
    }
}
