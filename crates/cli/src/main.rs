//! dialwatch: place outbound calls and follow them until they end

use anyhow::{Context, Result};
use clap::Parser;
use dialwatch_infra_common::{log_welcome, setup_logging};

mod cli;
mod commands;
mod config;
mod output;

use cli::{Cli, Command};
use config::DialwatchConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = DialwatchConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config)?;

    setup_logging(&config.logging).context("Failed to initialize logging")?;
    log_welcome(&config.logging.app_name, env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Command::Call(args) => commands::call::run(&config, args).await,
        Command::History(args) => commands::history::run(&config, args).await,
        Command::Status(args) => commands::status::run(&config, args).await,
        Command::Mode => {
            commands::show_mode(&config);
            Ok(())
        }
    }
}
