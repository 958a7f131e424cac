//! Subcommand implementations

use std::sync::Arc;

use anyhow::{Context, Result};
use dialwatch_call_core::ProviderMode;
use dialwatch_call_store::{CallStore, SqliteCallStore};
use dialwatch_call_tracker::{CallEngine, CallEngineBuilder};

use crate::config::DialwatchConfig;

pub mod call;
pub mod history;
pub mod status;

pub async fn open_store(config: &DialwatchConfig) -> Result<Arc<dyn CallStore>> {
    let store = SqliteCallStore::new(&config.store.database_url)
        .await
        .with_context(|| format!("Failed to open call store {}", config.store.database_url))?;
    Ok(Arc::new(store))
}

/// Engine wired from configuration, starting in `mode`
pub async fn build_engine(config: &DialwatchConfig, mode: ProviderMode) -> Result<CallEngine> {
    let store = open_store(config).await?;
    let engine = CallEngineBuilder::new()
        .mode(mode)
        .eqivo(config.eqivo.clone())
        .simulation(config.simulation.clone())
        .tracker(config.tracker.clone())
        .store(store)
        .build()
        .context("Failed to set up call engine")?;
    Ok(engine)
}

/// The configured mode, or simulated when `simulate` is set
pub fn effective_mode(config: &DialwatchConfig, simulate: bool) -> ProviderMode {
    if simulate {
        ProviderMode::Simulated
    } else {
        config.mode
    }
}

pub fn show_mode(config: &DialwatchConfig) {
    println!("Provider mode: {}", config.mode);
    let key = if config.eqivo.api_key().is_some() {
        "configured"
    } else {
        "not configured"
    };
    println!("API key:       {key}");
    println!(
        "Caller id:     {}",
        config.eqivo.caller_id().unwrap_or("not configured")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulate_flag_overrides_configured_mode() {
        let config = DialwatchConfig::default();
        assert_eq!(effective_mode(&config, false), ProviderMode::Live);
        assert_eq!(effective_mode(&config, true), ProviderMode::Simulated);
    }

    #[tokio::test]
    async fn engine_uses_configured_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DialwatchConfig::default();
        config.store.database_url =
            format!("sqlite://{}?mode=rwc", dir.path().join("calls.db").display());

        let engine = build_engine(&config, ProviderMode::Simulated).await.unwrap();
        assert_eq!(engine.initiator().mode(), ProviderMode::Simulated);
        assert!(engine.provider().live().is_none());
        assert!(engine.initiator().history().await.unwrap().is_empty());
        assert!(dir.path().join("calls.db").exists());
    }
}
