//! Placing calls and handing them to the tracker

use std::sync::Arc;

use dialwatch_call_core::{
    Call, CallError, CallLauncher, ModeSwitch, OutboundCall, ProviderMode, SimulationConfig,
};
use dialwatch_call_store::CallStore;
use tracing::{info, instrument};

use crate::error::TrackerResult;
use crate::events::{CallAlert, OutputTarget, TrackerEvent};
use crate::tracker::CallTracker;

/// Places outbound calls, records them and starts tracking
pub struct CallInitiator {
    launcher: Arc<dyn CallLauncher>,
    store: Arc<dyn CallStore>,
    tracker: CallTracker,
    mode: ModeSwitch,
    caller_id: Option<String>,
    simulated_caller_id: String,
}

impl CallInitiator {
    pub fn new(
        launcher: Arc<dyn CallLauncher>,
        store: Arc<dyn CallStore>,
        tracker: CallTracker,
        mode: ModeSwitch,
    ) -> Self {
        Self {
            launcher,
            store,
            tracker,
            mode,
            caller_id: None,
            simulated_caller_id: SimulationConfig::default().caller_id,
        }
    }

    /// Caller id presented on outbound calls; blank means unset
    pub fn with_caller_id(mut self, caller_id: Option<String>) -> Self {
        self.caller_id = caller_id
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        self
    }

    /// Caller id used in simulated mode when none is configured
    pub fn with_simulated_caller_id(mut self, caller_id: impl Into<String>) -> Self {
        self.simulated_caller_id = caller_id.into();
        self
    }

    pub fn tracker(&self) -> &CallTracker {
        &self.tracker
    }

    /// Place a call to `destination` and start tracking it
    ///
    /// The call is stored as `initiated` before tracking starts. `target`
    /// receives a `CallStarted` event followed by the session's own events.
    #[instrument(skip(self, target), fields(mode = %self.mode.mode()))]
    pub async fn initiate(&self, destination: &str, target: OutputTarget) -> TrackerResult<Call> {
        let destination = destination.trim();
        if destination.is_empty() {
            return Err(CallError::invalid_input("Phone number is required").into());
        }

        let caller_id = self.resolve_caller_id()?;
        let call = self
            .launcher
            .place_call(&OutboundCall::new(destination, caller_id))
            .await?;

        self.store.insert_or_replace(&call).await?;
        self.tracker.notifier().notify(CallAlert::started(&call));

        target.send(TrackerEvent::CallStarted { call: call.clone() });
        self.tracker.start(call.id.clone(), target);

        info!(call_id = %call.id, destination = %call.destination, "Call initiated");
        Ok(call)
    }

    /// Every stored call, newest first
    pub async fn history(&self) -> TrackerResult<Vec<Call>> {
        Ok(self.store.list_all().await?)
    }

    pub fn mode(&self) -> ProviderMode {
        self.mode.mode()
    }

    /// Switch provider mode; affects the next placement and the next poll of
    /// every running session. Returns the previous mode.
    pub fn set_mode(&self, mode: ProviderMode) -> ProviderMode {
        self.mode.set(mode)
    }

    fn resolve_caller_id(&self) -> Result<String, CallError> {
        if let Some(caller_id) = &self.caller_id {
            return Ok(caller_id.clone());
        }
        if self.mode.mode().is_simulated() {
            return Ok(self.simulated_caller_id.clone());
        }
        Err(CallError::missing_credential(
            "EQIVO_FROM or CALLER_ID is not set; configure a caller id for live calls",
        ))
    }
}
