//! Command-line arguments

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dialwatch_infra_common::parse_log_level;

use crate::config::DialwatchConfig;

#[derive(Parser, Debug)]
#[command(
    name = "dialwatch",
    version,
    about = "Place outbound calls and follow them until they end"
)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "DIALWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database URL, e.g. sqlite://calls.db?mode=rwc
    #[arg(long, global = true, env = "DIALWATCH_DATABASE")]
    pub database: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Place a call and follow its status until it ends
    Call(CallArgs),
    /// List stored calls, newest first
    History(HistoryArgs),
    /// Query the current status of a call
    Status(StatusArgs),
    /// Show which provider mode the configuration selects
    Mode,
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Destination phone number
    pub number: String,

    /// Use the simulated provider instead of the live API
    #[arg(long)]
    pub simulate: bool,

    /// Override the poll interval in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Print events as JSON lines
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Show at most this many calls
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Call id returned when the call was placed
    pub call_id: String,

    /// Use the simulated provider instead of the live API
    #[arg(long)]
    pub simulate: bool,

    /// Fetch the full call record from the live API
    #[arg(long, conflicts_with = "simulate")]
    pub details: bool,
}

impl Cli {
    /// Apply global flags on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut DialwatchConfig) -> Result<()> {
        if let Some(database) = &self.database {
            config.store.database_url = database.clone();
        }
        if let Some(level) = &self.log_level {
            parse_log_level(level).context("Invalid --log-level")?;
            config.logging.level = level.trim().to_lowercase();
        }
        if self.json_logs {
            config.logging.json = true;
        }
        if let Command::Call(args) = &self.command {
            if let Some(interval) = args.poll_interval_ms {
                config.tracker = config
                    .tracker
                    .clone()
                    .with_poll_interval(Duration::from_millis(interval));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_call_with_flags() {
        let cli = Cli::try_parse_from([
            "dialwatch",
            "--log-level",
            "DEBUG",
            "call",
            "5551234",
            "--simulate",
            "--poll-interval-ms",
            "1000",
        ])
        .unwrap();

        match &cli.command {
            Command::Call(args) => {
                assert_eq!(args.number, "5551234");
                assert!(args.simulate);
                assert!(!args.json);
            }
            other => panic!("Expected call command, got {other:?}"),
        }

        let mut config = DialwatchConfig::default();
        cli.apply_overrides(&mut config).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.tracker.poll_interval_ms, 1_000);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "dialwatch",
            "history",
            "--database",
            "sqlite://elsewhere.db",
            "--json-logs",
            "-n",
            "5",
        ])
        .unwrap();

        let mut config = DialwatchConfig::default();
        cli.apply_overrides(&mut config).unwrap();
        assert_eq!(config.store.database_url, "sqlite://elsewhere.db");
        assert!(config.logging.json);
        assert!(matches!(cli.command, Command::History(HistoryArgs { limit: Some(5), .. })));
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let cli = Cli::try_parse_from(["dialwatch", "--log-level", "loud", "mode"]).unwrap();
        assert!(cli.apply_overrides(&mut DialwatchConfig::default()).is_err());
    }

    #[test]
    fn details_conflicts_with_simulate() {
        assert!(
            Cli::try_parse_from(["dialwatch", "status", "abc", "--details", "--simulate"]).is_err()
        );
    }
}
