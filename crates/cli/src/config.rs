//! Application configuration
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. a TOML file (`--config`, or `<config dir>/dialwatch/config.toml` if present)
//! 3. environment variables (`RAPIDAPI_KEY`, `EQIVO_FROM`, ...)
//! 4. command-line flags, applied by the caller

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use dialwatch_call_core::{EqivoConfig, ProviderMode, SimulationConfig};
use dialwatch_call_tracker::TrackerConfig;
use dialwatch_infra_common::LoggingConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default SQLite database, created next to the working directory
pub const DEFAULT_DATABASE_URL: &str = "sqlite://calls.db?mode=rwc";

/// Where call records are kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub database_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

/// Everything the binary can be configured with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialwatchConfig {
    /// Provider mode used unless a command overrides it
    pub mode: ProviderMode,
    pub eqivo: EqivoConfig,
    pub simulation: SimulationConfig,
    pub tracker: TrackerConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

impl DialwatchConfig {
    /// `<config dir>/dialwatch/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dialwatch").join("config.toml"))
    }

    /// Load from `path` (or the default location) and the process environment
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Overlay environment variables read through `lookup`
    ///
    /// Blank values are ignored. `EQIVO_FROM` wins over `CALLER_ID`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(key) = get("RAPIDAPI_KEY") {
            self.eqivo.api_key = Some(key);
        }
        if let Some(caller_id) = get("EQIVO_FROM").or_else(|| get("CALLER_ID")) {
            self.eqivo.caller_id = Some(caller_id);
        }
        if let Some(gateways) = get("EQIVO_GATEWAYS") {
            self.eqivo.gateways = gateways;
        }
        if let Some(answer_url) = get("EQIVO_ANSWER_URL") {
            self.eqivo.answer_url = answer_url;
        }
        if let Some(hangup_url) = get("EQIVO_HANGUP_URL") {
            self.eqivo.hangup_url = Some(hangup_url);
        }
        if let Some(ring_url) = get("EQIVO_RING_URL") {
            self.eqivo.ring_url = Some(ring_url);
        }
        if let Some(time_limit) = get("EQIVO_TIME_LIMIT") {
            self.eqivo.time_limit = Some(time_limit);
        }
        if let Some(hangup_on_ring) = get("EQIVO_HANGUP_ON_RING") {
            self.eqivo.hangup_on_ring = Some(hangup_on_ring);
        }
        if let Some(mode) = get("DIALWATCH_MODE") {
            self.mode = mode
                .parse()
                .map_err(|e| anyhow!("Invalid DIALWATCH_MODE {mode:?}: {e}"))?;
        }
        Ok(())
    }
}
