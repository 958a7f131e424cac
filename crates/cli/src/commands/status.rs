use anyhow::{anyhow, Context, Result};
use dialwatch_call_core::{CallId, ProviderMode, StatusProvider};

use super::{build_engine, effective_mode};
use crate::cli::StatusArgs;
use crate::config::DialwatchConfig;
use crate::output::{details_lines, status_label};

pub async fn run(config: &DialwatchConfig, args: &StatusArgs) -> Result<()> {
    let mode = effective_mode(config, args.simulate);
    let engine = build_engine(config, mode).await?;
    let call_id = CallId::new(args.call_id.trim());

    if args.details {
        if mode == ProviderMode::Simulated {
            return Err(anyhow!("Call details are only available from the live API"));
        }
        let live = engine
            .provider()
            .live()
            .ok_or_else(|| anyhow!("RAPIDAPI_KEY is not set; live call details are unavailable"))?;
        let details = live
            .call_details(&call_id)
            .await
            .with_context(|| format!("Failed to fetch details for {call_id}"))?;
        for line in details_lines(&details) {
            println!("{line}");
        }
        return Ok(());
    }

    let status = engine
        .provider()
        .query_status(&call_id)
        .await
        .with_context(|| format!("Failed to query status of {call_id}"))?;
    println!("{call_id}: {}", status_label(&status));

    if let Some(stored) = engine.store().get(&call_id).await? {
        if stored.status != status {
            println!("(last recorded status: {})", status_label(&stored.status));
        }
    }
    Ok(())
}
