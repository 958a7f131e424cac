use anyhow::{Context, Result};
use dialwatch_call_tracker::{OutputTarget, TrackerEvent};
use tracing::info;

use super::{build_engine, effective_mode};
use crate::cli::CallArgs;
use crate::config::DialwatchConfig;
use crate::output::{describe_event, event_json};

/// Place a call and print its events until tracking ends
///
/// Ctrl-C stops tracking; the call itself is left to the provider.
pub async fn run(config: &DialwatchConfig, args: &CallArgs) -> Result<()> {
    let engine = build_engine(config, effective_mode(config, args.simulate)).await?;

    let (target, mut events) = OutputTarget::channel();
    let call = engine
        .initiator()
        .initiate(&args.number, target)
        .await
        .context("Failed to start call")?;

    let print = |event: &TrackerEvent| {
        if args.json {
            println!("{}", event_json(event));
        } else {
            println!("{}", describe_event(event));
        }
    };

    let mut interrupted = false;
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                print(&event);
                if matches!(event, TrackerEvent::TrackingEnded { .. }) {
                    break;
                }
            }
            signal = tokio::signal::ctrl_c(), if !interrupted => {
                signal.context("Failed to listen for Ctrl-C")?;
                info!(call_id = %call.id, "Interrupted, stopping tracking");
                interrupted = true;
                engine.tracker().stop(&call.id);
            }
        }
    }

    Ok(())
}
