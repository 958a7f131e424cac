//! Assembling a ready-to-use call engine
//!
//! [`CallEngineBuilder`] wires the provider pair, the store, the tracker and
//! the initiator together so they share one [`ModeSwitch`].
//!
//! ```rust
//! use dialwatch_call_core::{ProviderMode, SimulationConfig};
//! use dialwatch_call_tracker::{CallEngineBuilder, OutputTarget};
//!
//! # tokio_test::block_on(async {
//! let engine = CallEngineBuilder::new()
//!     .mode(ProviderMode::Simulated)
//!     .simulation(SimulationConfig::instant())
//!     .build()
//!     .expect("engine");
//!
//! let (target, _events) = OutputTarget::channel();
//! let call = engine.initiator().initiate("5551234", target).await.expect("call");
//! assert!(engine.tracker().is_tracking(&call.id));
//! engine.tracker().shutdown().await;
//! # });
//! ```

use std::sync::Arc;

use dialwatch_call_core::{
    Clock, EqivoConfig, EqivoProvider, ModeSwitch, ProviderMode, SimulatedProvider,
    SimulationConfig, SwitchingProvider, SystemClock,
};
use dialwatch_call_store::{CallStore, MemoryCallStore};
use tracing::{info, warn};

use crate::config::TrackerConfig;
use crate::error::TrackerResult;
use crate::events::{AlertNotifier, LogNotifier};
use crate::initiator::CallInitiator;
use crate::tracker::CallTracker;

/// Fluent builder for [`CallEngine`]
pub struct CallEngineBuilder {
    eqivo: Option<EqivoConfig>,
    simulation: SimulationConfig,
    tracker: TrackerConfig,
    mode: ProviderMode,
    store: Option<Arc<dyn CallStore>>,
    notifier: Arc<dyn AlertNotifier>,
    clock: Arc<dyn Clock>,
}

impl Default for CallEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CallEngineBuilder {
    pub fn new() -> Self {
        Self {
            eqivo: None,
            simulation: SimulationConfig::default(),
            tracker: TrackerConfig::default(),
            mode: ProviderMode::Live,
            store: None,
            notifier: Arc::new(LogNotifier),
            clock: Arc::new(SystemClock),
        }
    }

    /// Live provider settings; without an API key only simulated mode works
    pub fn eqivo(mut self, config: EqivoConfig) -> Self {
        self.eqivo = Some(config);
        self
    }

    pub fn simulation(mut self, config: SimulationConfig) -> Self {
        self.simulation = config;
        self
    }

    pub fn tracker(mut self, config: TrackerConfig) -> Self {
        self.tracker = config;
        self
    }

    /// Initial provider mode
    pub fn mode(mut self, mode: ProviderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Call store; defaults to an in-memory store
    pub fn store(mut self, store: Arc<dyn CallStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn AlertNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Clock used to stamp new calls and age simulated ones
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> TrackerResult<CallEngine> {
        let mode = ModeSwitch::new(self.mode);
        let caller_id = self
            .eqivo
            .as_ref()
            .and_then(|c| c.caller_id())
            .map(str::to_string);

        let live = match self.eqivo {
            Some(config) if config.api_key().is_some() => {
                Some(Arc::new(EqivoProvider::with_clock(config, self.clock.clone())?))
            }
            _ => {
                if !self.mode.is_simulated() {
                    warn!("No telephony API key configured; live requests will fail until one is set");
                }
                None
            }
        };

        let simulated_caller_id = self.simulation.caller_id.clone();
        let simulated = Arc::new(SimulatedProvider::new(self.clock, self.simulation));
        let provider = Arc::new(SwitchingProvider::new(live, simulated, mode.clone()));
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryCallStore::new()));

        let tracker =
            CallTracker::with_notifier(provider.clone(), store.clone(), self.notifier, self.tracker);
        let initiator = CallInitiator::new(provider.clone(), store.clone(), tracker.clone(), mode)
            .with_caller_id(caller_id)
            .with_simulated_caller_id(simulated_caller_id);

        info!(mode = %self.mode, "Call engine ready");
        Ok(CallEngine {
            provider,
            store,
            tracker,
            initiator,
        })
    }
}

/// A wired provider, store, tracker and initiator
pub struct CallEngine {
    provider: Arc<SwitchingProvider>,
    store: Arc<dyn CallStore>,
    tracker: CallTracker,
    initiator: CallInitiator,
}

impl CallEngine {
    pub fn builder() -> CallEngineBuilder {
        CallEngineBuilder::new()
    }

    pub fn provider(&self) -> &Arc<SwitchingProvider> {
        &self.provider
    }

    pub fn store(&self) -> &Arc<dyn CallStore> {
        &self.store
    }

    pub fn tracker(&self) -> &CallTracker {
        &self.tracker
    }

    pub fn initiator(&self) -> &CallInitiator {
        &self.initiator
    }
}
