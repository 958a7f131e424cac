//! # dialwatch call-core
//!
//! Building blocks shared by every dialwatch crate:
//!
//! - **Call model** - [`Call`], [`CallId`], [`OutboundCall`]
//! - **Status vocabulary** - [`CallStatus`] and provider status normalization
//! - **Providers** - the [`StatusProvider`] and [`CallLauncher`] traits with a
//!   live Eqivo implementation, a simulated one and a mode-switching router
//! - **Clocks** - injectable time sources for deterministic tests
//! - **Errors** - [`CallError`], classifying failures as fatal or retryable
//!
//! ## Quick look
//!
//! ```rust
//! use std::sync::Arc;
//! use dialwatch_call_core::{CallId, CallStatus, ManualClock, SimulatedProvider, SimulationConfig, StatusProvider};
//!
//! # async fn example() -> Result<(), dialwatch_call_core::CallError> {
//! let clock = Arc::new(ManualClock::new(10_000));
//! let provider = SimulatedProvider::new(clock.clone(), SimulationConfig::instant());
//!
//! let id = CallId::new("mock-10000-abcdefghi");
//! clock.advance(1_500);
//! assert_eq!(provider.query_status(&id).await?, CallStatus::Ringing);
//! # Ok(())
//! # }
//! ```

pub mod call;
pub mod clock;
pub mod config;
pub mod error;
pub mod provider;
pub mod status;

pub use call::{Call, CallId, OutboundCall};
pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
pub use config::{EqivoConfig, SimulationConfig};
pub use error::{CallError, CallResult};
pub use provider::{
    CallDetails, CallLauncher, EqivoProvider, ModeSwitch, ProviderMode, SimulatedProvider,
    StatusProvider, SwitchingProvider,
};
pub use status::CallStatus;
