//! Status providers
//!
//! A status provider answers one question: "what is the current status of
//! this call?". Two interchangeable implementations exist:
//!
//! - [`EqivoProvider`] talks to the live Eqivo telephony API
//! - [`SimulatedProvider`] derives the status from the time elapsed since the
//!   creation timestamp embedded in a simulated call id
//!
//! [`SwitchingProvider`] routes every request through whichever of the two a
//! shared [`ModeSwitch`] currently selects, so flipping the switch affects the
//! very next poll of every in-flight call.
//!
//! ```text
//! ┌──────────────┐      ┌────────────────────┐
//! │ Call Tracker │─────▶│ SwitchingProvider  │◀── ModeSwitch
//! └──────────────┘      └─────┬─────────┬────┘
//!                             │         │
//!                    ┌────────▼───┐ ┌───▼──────────────┐
//!                    │EqivoProvider│ │SimulatedProvider │
//!                    └────────────┘ └──────────────────┘
//! ```

use async_trait::async_trait;

use crate::call::{Call, CallId, OutboundCall};
use crate::error::CallResult;
use crate::status::CallStatus;

pub mod live;
pub mod simulated;
pub mod switch;

pub use live::{CallDetails, EqivoProvider};
pub use simulated::SimulatedProvider;
pub use switch::{ModeSwitch, ProviderMode, SwitchingProvider};

/// Look up the normalized status of a call
///
/// Implementations must map "call no longer known to the provider" onto
/// [`CallStatus::Ended`] rather than an error, and report every other remote
/// failure as a retryable [`CallError`](crate::CallError).
#[async_trait]
pub trait StatusProvider: Send + Sync {
    /// Query the current status of `call_id`
    async fn query_status(&self, call_id: &CallId) -> CallResult<CallStatus>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Place outbound calls
#[async_trait]
pub trait CallLauncher: Send + Sync {
    /// Place the call and return its record in the `initiated` state
    async fn place_call(&self, request: &OutboundCall) -> CallResult<Call>;
}
