//! Simulated telephony provider
//!
//! Lets the tracker and any front end run without a network dependency.
//! Simulated call ids embed their creation time (`mock-<ms>-<suffix>`) and the
//! status is a pure function of the time elapsed since then:
//!
//! | elapsed      | status      |
//! |--------------|-------------|
//! | `[0s, 1s)`   | `initiated` |
//! | `[1s, 2s)`   | `ringing`   |
//! | `[2s, 4s)`   | `answered`  |
//! | `[4s, ∞)`    | `ended`     |

use std::sync::Arc;

use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::debug;

use super::{CallLauncher, StatusProvider};
use crate::call::{Call, CallId, OutboundCall};
use crate::clock::{Clock, SystemClock};
use crate::config::SimulationConfig;
use crate::error::{CallError, CallResult};
use crate::status::CallStatus;

/// Prefix of every simulated call id
pub const SIMULATED_ID_PREFIX: &str = "mock";

const RINGING_AFTER_MS: i64 = 1_000;
const ANSWERED_AFTER_MS: i64 = 2_000;
const ENDED_AFTER_MS: i64 = 4_000;

/// Status of a simulated call `elapsed_ms` after its creation
pub fn status_after(elapsed_ms: i64) -> CallStatus {
    if elapsed_ms < RINGING_AFTER_MS {
        CallStatus::Initiated
    } else if elapsed_ms < ANSWERED_AFTER_MS {
        CallStatus::Ringing
    } else if elapsed_ms < ENDED_AFTER_MS {
        CallStatus::Answered
    } else {
        CallStatus::Ended
    }
}

/// Build a simulated call id carrying `created_at` (epoch ms)
pub fn simulated_call_id(created_at: i64) -> CallId {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();
    CallId::new(format!("{SIMULATED_ID_PREFIX}-{created_at}-{suffix}"))
}

/// Extract the creation timestamp from a simulated call id
pub fn created_at_of(call_id: &CallId) -> Option<i64> {
    let mut parts = call_id.as_str().split('-');
    match (parts.next(), parts.next()) {
        (Some(SIMULATED_ID_PREFIX), Some(millis)) => millis.parse().ok(),
        _ => None,
    }
}

/// Deterministic, network-free provider
pub struct SimulatedProvider {
    clock: Arc<dyn Clock>,
    config: SimulationConfig,
}

impl SimulatedProvider {
    pub fn new(clock: Arc<dyn Clock>, config: SimulationConfig) -> Self {
        Self { clock, config }
    }

    /// Simulated provider on the system clock with default latencies
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock), SimulationConfig::default())
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Status the call has at this instant, without any latency
    ///
    /// Ids that carry no parseable timestamp are treated as created "now"
    /// and therefore report `initiated`.
    pub fn status_now(&self, call_id: &CallId) -> CallStatus {
        let now = self.clock.now_millis();
        let created_at = created_at_of(call_id).unwrap_or(now);
        status_after(now - created_at)
    }
}

#[async_trait]
impl StatusProvider for SimulatedProvider {
    async fn query_status(&self, call_id: &CallId) -> CallResult<CallStatus> {
        if call_id.is_blank() {
            return Err(CallError::invalid_input("Call id is required"));
        }
        let latency = self.config.query_latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        let status = self.status_now(call_id);
        debug!(call_id = %call_id, status = %status, "Simulated status query");
        Ok(status)
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

#[async_trait]
impl CallLauncher for SimulatedProvider {
    async fn place_call(&self, request: &OutboundCall) -> CallResult<Call> {
        let latency = self.config.place_latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        let created_at = self.clock.now_millis();
        let call = Call::initiated(
            simulated_call_id(created_at),
            request.destination.trim(),
            created_at,
        );
        debug!(call_id = %call.id, destination = %call.destination, "Simulated call placed");
        Ok(call)
    }
}
