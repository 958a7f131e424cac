//! Tracker events and alerts
//!
//! Every tracking session reports to an [`OutputTarget`] chosen when the
//! session is started. The target is a one-way channel: if the receiving side
//! has gone away, events are dropped and the session keeps running.
//!
//! Alerts are the user-facing notifications ("Call Ringing", "Call Ended",
//! ...). They go through an [`AlertNotifier`], which is shared by all
//! sessions of one tracker.

use dialwatch_call_core::{Call, CallId, CallStatus};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, trace};

/// Why a tracking session stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "status", rename_all = "snake_case")]
pub enum EndReason {
    /// The provider reported a terminal status
    Terminal(CallStatus),
    /// `stop` or `shutdown` was called
    Cancelled,
}

/// Event delivered to a session's output target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackerEvent {
    /// A call was placed and tracking started
    CallStarted { call: Call },

    /// The observed status differs from the last one seen
    StatusChanged {
        call_id: CallId,
        previous: CallStatus,
        status: CallStatus,
    },

    /// A status query failed or timed out; tracking continues
    PollFailed { call_id: CallId, error: String },

    /// The new status could not be written to the store
    PersistFailed {
        call_id: CallId,
        status: CallStatus,
        error: String,
    },

    /// The session is finished and will not report again
    TrackingEnded { call_id: CallId, reason: EndReason },
}

impl TrackerEvent {
    pub fn call_id(&self) -> &CallId {
        match self {
            TrackerEvent::CallStarted { call } => &call.id,
            TrackerEvent::StatusChanged { call_id, .. }
            | TrackerEvent::PollFailed { call_id, .. }
            | TrackerEvent::PersistFailed { call_id, .. }
            | TrackerEvent::TrackingEnded { call_id, .. } => call_id,
        }
    }
}

/// Receiving half of an [`OutputTarget`]
pub type EventReceiver = mpsc::UnboundedReceiver<TrackerEvent>;

/// Where a session sends its events
///
/// Cloning is cheap; clones feed the same receiver.
#[derive(Debug, Clone)]
pub struct OutputTarget {
    tx: Option<mpsc::UnboundedSender<TrackerEvent>>,
}

impl OutputTarget {
    /// A new target and the receiver that observes it
    pub fn channel() -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A target that discards everything
    pub fn detached() -> Self {
        Self { tx: None }
    }

    /// Whether anyone is still listening
    pub fn is_open(&self) -> bool {
        self.tx.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// Deliver an event, ignoring a receiver that has gone away
    pub fn send(&self, event: TrackerEvent) {
        let Some(tx) = &self.tx else {
            return;
        };
        if tx.send(event).is_err() {
            trace!("Output target closed, event dropped");
        }
    }
}

/// User-facing notification about a call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallAlert {
    pub call_id: CallId,
    pub status: CallStatus,
    pub title: String,
    pub body: String,
}

impl CallAlert {
    /// Alert for a status transition; `None` for statuses that are not announced
    pub fn for_status(call_id: &CallId, status: &CallStatus) -> Option<Self> {
        let (title, body) = status.alert_text()?;
        Some(Self {
            call_id: call_id.clone(),
            status: status.clone(),
            title: title.to_string(),
            body: body.to_string(),
        })
    }

    /// Alert for a freshly placed call
    pub fn started(call: &Call) -> Self {
        Self {
            call_id: call.id.clone(),
            status: call.status.clone(),
            title: "Call Started".to_string(),
            body: format!("Calling {}", call.destination),
        }
    }
}

/// Delivers alerts to the user
pub trait AlertNotifier: Send + Sync {
    fn notify(&self, alert: CallAlert);
}

/// Notifier that writes alerts to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl AlertNotifier for LogNotifier {
    fn notify(&self, alert: CallAlert) {
        info!(call_id = %alert.call_id, status = %alert.status, "{}: {}", alert.title, alert.body);
    }
}

/// Notifier that forwards alerts to a channel
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<CallAlert>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<CallAlert>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl AlertNotifier for ChannelNotifier {
    fn notify(&self, alert: CallAlert) {
        let _ = self.tx.send(alert);
    }
}
