use anyhow::{Context, Result};

use super::open_store;
use crate::cli::HistoryArgs;
use crate::config::DialwatchConfig;
use crate::output::history_table;

pub async fn run(config: &DialwatchConfig, args: &HistoryArgs) -> Result<()> {
    let store = open_store(config).await?;
    let mut calls = store.list_all().await.context("Failed to read call history")?;
    if let Some(limit) = args.limit {
        calls.truncate(limit);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&calls)?);
    } else if calls.is_empty() {
        println!("No calls yet");
    } else {
        println!("{}", history_table(&calls));
    }
    Ok(())
}
