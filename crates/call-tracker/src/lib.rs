//! # dialwatch call-tracker
//!
//! Follows placed calls through their lifecycle.
//!
//! For every tracked call a session polls the active [`StatusProvider`] on a
//! fixed interval, compares the answer with the last status it saw and, on a
//! change, persists it, emits a [`TrackerEvent`] to the session's
//! [`OutputTarget`] and raises a [`CallAlert`] for ringing, answered and ended.
//! A terminal status (`ended` or `failed`) ends the session on its own;
//! [`CallTracker::stop`] ends it early.
//!
//! ```text
//!   CallInitiator ──place──▶ CallLauncher
//!        │
//!        ├──insert──▶ CallStore ◀──update_status──┐
//!        │                                        │
//!        └──start──▶ CallTracker ──spawn──▶ TrackingSession ──query──▶ StatusProvider
//!                                                 │
//!                                                 ├──▶ OutputTarget (events)
//!                                                 └──▶ AlertNotifier (alerts)
//! ```
//!
//! [`StatusProvider`]: dialwatch_call_core::StatusProvider

pub mod builder;
pub mod config;
pub mod error;
pub mod events;
pub mod initiator;
mod session;
pub mod tracker;

pub use builder::{CallEngine, CallEngineBuilder};
pub use config::TrackerConfig;
pub use error::{TrackerError, TrackerResult};
pub use events::{
    AlertNotifier, CallAlert, ChannelNotifier, EndReason, EventReceiver, LogNotifier,
    OutputTarget, TrackerEvent,
};
pub use initiator::CallInitiator;
pub use tracker::CallTracker;
