//! Canonical call status vocabulary and provider status normalization
//!
//! Calls move through `initiated → ringing → answered → ended`, with `failed`
//! as an independent absorbing state. `unknown` is reported when the provider
//! answers for a call it knows about but without any interpretable status.
//!
//! The tracker does not validate transitions: the provider is the source of
//! truth for sequencing, so out-of-order or skipped states are accepted and
//! the only gate is "differs from the last known status".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical status of an outbound call
///
/// Provider values outside the canonical vocabulary are carried verbatim
/// (lower-cased) in [`CallStatus::Other`] so new provider states flow through
/// without a code change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum CallStatus {
    /// Call accepted by the provider, not yet ringing
    Initiated,
    /// Destination is ringing
    Ringing,
    /// Destination picked up
    Answered,
    /// Call finished normally (terminal)
    Ended,
    /// Call could not be completed (terminal)
    Failed,
    /// Provider knows the call but reported no status
    Unknown,
    /// Unmapped provider status, passed through unchanged
    Other(String),
}

/// Provider vocabulary → canonical status. Keys are lower-case.
const PROVIDER_STATUS_MAP: &[(&str, CallStatus)] = &[
    ("initiated", CallStatus::Initiated),
    ("ringing", CallStatus::Ringing),
    ("answered", CallStatus::Answered),
    ("in-progress", CallStatus::Answered),
    ("completed", CallStatus::Ended),
    ("ended", CallStatus::Ended),
    ("hangup", CallStatus::Ended),
    ("cancelled", CallStatus::Ended),
    ("failed", CallStatus::Failed),
    ("busy", CallStatus::Failed),
    ("no-answer", CallStatus::Failed),
    ("unknown", CallStatus::Unknown),
];

impl CallStatus {
    /// Normalize a raw provider status (case-insensitive)
    ///
    /// ```rust
    /// use dialwatch_call_core::CallStatus;
    ///
    /// assert_eq!(CallStatus::from_provider("COMPLETED"), CallStatus::Ended);
    /// assert_eq!(CallStatus::from_provider("in-progress"), CallStatus::Answered);
    /// assert_eq!(CallStatus::from_provider("queued"), CallStatus::Other("queued".into()));
    /// ```
    pub fn from_provider(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        PROVIDER_STATUS_MAP
            .iter()
            .find(|(key, _)| *key == normalized)
            .map(|(_, status)| status.clone())
            .unwrap_or(CallStatus::Other(normalized))
    }

    /// The status name as persisted and emitted
    pub fn as_str(&self) -> &str {
        match self {
            CallStatus::Initiated => "initiated",
            CallStatus::Ringing => "ringing",
            CallStatus::Answered => "answered",
            CallStatus::Ended => "ended",
            CallStatus::Failed => "failed",
            CallStatus::Unknown => "unknown",
            CallStatus::Other(raw) => raw,
        }
    }

    /// `ended` and `failed` end tracking; nothing follows them
    pub fn is_terminal(&self) -> bool {
        matches!(self, CallStatus::Ended | CallStatus::Failed)
    }

    /// User-facing alert text for statuses that warrant one
    pub fn alert_text(&self) -> Option<(&'static str, &'static str)> {
        match self {
            CallStatus::Ringing => Some(("Call Ringing", "The call is ringing...")),
            CallStatus::Answered => Some(("Call Answered", "The call has been answered")),
            CallStatus::Ended => Some(("Call Ended", "The call has ended")),
            _ => None,
        }
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for CallStatus {
    fn from(value: String) -> Self {
        CallStatus::from_provider(&value)
    }
}

impl From<CallStatus> for String {
    fn from(value: CallStatus) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for CallStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CallStatus::from(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_provider_value() {
        let cases = [
            ("initiated", CallStatus::Initiated),
            ("ringing", CallStatus::Ringing),
            ("answered", CallStatus::Answered),
            ("in-progress", CallStatus::Answered),
            ("completed", CallStatus::Ended),
            ("ended", CallStatus::Ended),
            ("hangup", CallStatus::Ended),
            ("cancelled", CallStatus::Ended),
            ("failed", CallStatus::Failed),
            ("busy", CallStatus::Failed),
            ("no-answer", CallStatus::Failed),
        ];
        for (raw, expected) in cases {
            assert_eq!(CallStatus::from_provider(raw), expected, "provider value {raw}");
        }
    }

    #[test]
    fn mapping_is_case_insensitive() {
        assert_eq!(CallStatus::from_provider("COMPLETED"), CallStatus::Ended);
        assert_eq!(CallStatus::from_provider("Ringing"), CallStatus::Ringing);
        assert_eq!(CallStatus::from_provider("In-Progress"), CallStatus::Answered);
        assert_eq!(CallStatus::from_provider("NO-ANSWER"), CallStatus::Failed);
    }

    #[test]
    fn unmapped_values_pass_through() {
        let status = CallStatus::from_provider("queued");
        assert_eq!(status, CallStatus::Other("queued".to_string()));
        assert_eq!(status.as_str(), "queued");
        assert!(!status.is_terminal());
    }

    #[test]
    fn only_ended_and_failed_are_terminal() {
        assert!(CallStatus::Ended.is_terminal());
        assert!(CallStatus::Failed.is_terminal());
        for status in [
            CallStatus::Initiated,
            CallStatus::Ringing,
            CallStatus::Answered,
            CallStatus::Unknown,
        ] {
            assert!(!status.is_terminal(), "{status} should not be terminal");
        }
    }

    #[test]
    fn alerts_for_ringing_answered_and_ended_only() {
        assert_eq!(
            CallStatus::Ringing.alert_text().map(|(_, body)| body),
            Some("The call is ringing...")
        );
        assert_eq!(
            CallStatus::Answered.alert_text().map(|(_, body)| body),
            Some("The call has been answered")
        );
        assert_eq!(
            CallStatus::Ended.alert_text().map(|(_, body)| body),
            Some("The call has ended")
        );
        assert!(CallStatus::Initiated.alert_text().is_none());
        assert!(CallStatus::Failed.alert_text().is_none());
        assert!(CallStatus::Unknown.alert_text().is_none());
    }

    #[test]
    fn provider_unknown_is_the_canonical_unknown() {
        assert_eq!(CallStatus::from_provider("UNKNOWN"), CallStatus::Unknown);
        assert_eq!(CallStatus::from_provider(" unknown "), CallStatus::Unknown);
        for raw in ["unknown", "Unknown", "queued", "COMPLETED"] {
            let status = CallStatus::from_provider(raw);
            let parsed: CallStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn persisted_form_parses_back() {
        for status in [
            CallStatus::Initiated,
            CallStatus::Ringing,
            CallStatus::Answered,
            CallStatus::Ended,
            CallStatus::Failed,
            CallStatus::Unknown,
            CallStatus::Other("queued".into()),
        ] {
            let parsed: CallStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&CallStatus::Answered).unwrap();
        assert_eq!(json, "\"answered\"");
        let back: CallStatus = serde_json::from_str("\"busy\"").unwrap();
        assert_eq!(back, CallStatus::Failed);
    }
}
