//! Live/simulated mode selection
//!
//! The mode is an explicit value: callers create a [`ModeSwitch`], hand clones
//! of it to whatever needs to observe or flip it, and every
//! [`SwitchingProvider`] request reads it at call time.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{CallLauncher, EqivoProvider, SimulatedProvider, StatusProvider};
use crate::call::{Call, CallId, OutboundCall};
use crate::error::{CallError, CallResult};
use crate::status::CallStatus;

/// Which provider serves requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderMode {
    /// The remote telephony API
    #[default]
    Live,
    /// The deterministic offline provider
    Simulated,
}

impl ProviderMode {
    pub fn is_simulated(self) -> bool {
        self == ProviderMode::Simulated
    }
}

impl fmt::Display for ProviderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderMode::Live => f.write_str("live"),
            ProviderMode::Simulated => f.write_str("simulated"),
        }
    }
}

impl FromStr for ProviderMode {
    type Err = CallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(ProviderMode::Live),
            "simulated" | "mock" => Ok(ProviderMode::Simulated),
            other => Err(CallError::config(format!("unknown provider mode: {other}"))),
        }
    }
}

/// Shared, cloneable live/simulated toggle
#[derive(Debug, Clone)]
pub struct ModeSwitch {
    simulated: Arc<AtomicBool>,
}

impl ModeSwitch {
    pub fn new(mode: ProviderMode) -> Self {
        Self {
            simulated: Arc::new(AtomicBool::new(mode.is_simulated())),
        }
    }

    pub fn mode(&self) -> ProviderMode {
        if self.simulated.load(Ordering::SeqCst) {
            ProviderMode::Simulated
        } else {
            ProviderMode::Live
        }
    }

    /// Select a mode; returns the previous one
    pub fn set(&self, mode: ProviderMode) -> ProviderMode {
        let was_simulated = self.simulated.swap(mode.is_simulated(), Ordering::SeqCst);
        let previous = if was_simulated {
            ProviderMode::Simulated
        } else {
            ProviderMode::Live
        };
        if previous != mode {
            info!(from = %previous, to = %mode, "Provider mode changed");
        }
        previous
    }
}

impl Default for ModeSwitch {
    fn default() -> Self {
        Self::new(ProviderMode::default())
    }
}

/// Routes each request to the live or simulated provider
///
/// The live provider is optional: without credentials only simulated mode can
/// serve requests, and live requests fail with `MissingCredential`.
pub struct SwitchingProvider {
    live: Option<Arc<EqivoProvider>>,
    simulated: Arc<SimulatedProvider>,
    mode: ModeSwitch,
}

impl SwitchingProvider {
    pub fn new(
        live: Option<Arc<EqivoProvider>>,
        simulated: Arc<SimulatedProvider>,
        mode: ModeSwitch,
    ) -> Self {
        Self { live, simulated, mode }
    }

    pub fn mode(&self) -> &ModeSwitch {
        &self.mode
    }

    pub fn live(&self) -> Option<&Arc<EqivoProvider>> {
        self.live.as_ref()
    }

    fn require_live(&self) -> CallResult<&Arc<EqivoProvider>> {
        self.live.as_ref().ok_or_else(|| {
            CallError::missing_credential(
                "live mode selected but no telephony API key is configured",
            )
        })
    }
}

#[async_trait]
impl StatusProvider for SwitchingProvider {
    async fn query_status(&self, call_id: &CallId) -> CallResult<CallStatus> {
        match self.mode.mode() {
            ProviderMode::Simulated => self.simulated.query_status(call_id).await,
            ProviderMode::Live => self.require_live()?.query_status(call_id).await,
        }
    }

    fn name(&self) -> &'static str {
        match self.mode.mode() {
            ProviderMode::Simulated => self.simulated.name(),
            ProviderMode::Live => "eqivo",
        }
    }
}

#[async_trait]
impl CallLauncher for SwitchingProvider {
    async fn place_call(&self, request: &OutboundCall) -> CallResult<Call> {
        match self.mode.mode() {
            ProviderMode::Simulated => self.simulated.place_call(request).await,
            ProviderMode::Live => self.require_live()?.place_call(request).await,
        }
    }
}
