//! Error types for call placement and status queries

use thiserror::Error;

/// Result type for call-core operations
pub type CallResult<T> = Result<T, CallError>;

/// Errors that can occur while placing or querying a call
///
/// The variants follow the failure taxonomy the tracker relies on:
/// input and credential errors are surfaced to the caller immediately and are
/// never retried, while provider, network and timeout errors are transient and
/// simply retried on the next poll.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CallError {
    /// Caller supplied an unusable value (empty destination, blank call id, ...)
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// A credential or required identity is not configured
    #[error("Missing credential: {message}")]
    MissingCredential { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The telephony API answered with a non-success status
    #[error("Provider request failed{}: {message}", status_suffix(.status))]
    Provider { status: Option<u16>, message: String },

    /// The telephony API answered but the body could not be interpreted
    #[error("Malformed provider response: {message}")]
    MalformedResponse { message: String },

    /// Transport-level failure talking to the telephony API
    #[error("Network error: {message}")]
    Network { message: String },

    /// A status query did not complete in time
    #[error("Operation timed out after {millis} ms")]
    Timeout { millis: u64 },
}

impl CallError {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a missing credential error
    pub fn missing_credential(message: impl Into<String>) -> Self {
        Self::MissingCredential {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a provider error for an HTTP status
    pub fn provider(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Provider {
            status,
            message: message.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Whether the operation may succeed if simply tried again later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Provider { .. } | Self::MalformedResponse { .. } | Self::Network { .. } | Self::Timeout { .. }
        )
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" ({code})"),
        None => String::new(),
    }
}

impl From<reqwest::Error> for CallError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // reqwest does not expose the configured duration on the error
            Self::network(format!("request timed out: {err}"))
        } else if err.is_decode() {
            Self::malformed(err.to_string())
        } else if let Some(status) = err.status() {
            Self::provider(Some(status.as_u16()), err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}
