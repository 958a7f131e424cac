//! Call records and identifiers

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::status::CallStatus;

/// Opaque call identifier assigned by the telephony provider
///
/// Simulated calls carry their creation time inside the id
/// (`mock-<created_at_ms>-<suffix>`), see
/// [`SimulatedProvider`](crate::provider::SimulatedProvider).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    /// Wrap a provider-assigned identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the id is empty or only whitespace
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CallId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CallId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One outbound call attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    /// Provider-assigned identifier, unique per call
    pub id: CallId,
    /// Dialed number, immutable after creation
    pub destination: String,
    /// Last persisted status
    pub status: CallStatus,
    /// Creation time in epoch milliseconds
    pub created_at: i64,
}

impl Call {
    /// A freshly placed call in the `initiated` state
    pub fn initiated(id: CallId, destination: impl Into<String>, created_at: i64) -> Self {
        Self {
            id,
            destination: destination.into(),
            status: CallStatus::Initiated,
            created_at,
        }
    }
}

/// Request to place an outbound call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundCall {
    /// Number to dial
    pub destination: String,
    /// Caller id presented to the destination
    pub caller_id: String,
}

impl OutboundCall {
    pub fn new(destination: impl Into<String>, caller_id: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            caller_id: caller_id.into(),
        }
    }
}
