//! Provider configuration
//!
//! [`EqivoConfig`] describes how to reach the live telephony API and which
//! call parameters to send; [`SimulationConfig`] tunes the simulated provider.
//! Both deserialize from the `[eqivo]` and `[simulation]` sections of the
//! application configuration and fall back to the defaults below.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default API base URL, including the API version segment
pub const DEFAULT_EQIVO_BASE_URL: &str = "https://eqivo-telephony.p.rapidapi.com/v0.1";

/// Default RapidAPI host header value
pub const DEFAULT_EQIVO_HOST: &str = "eqivo-telephony.p.rapidapi.com";

/// Settings for the live Eqivo telephony API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqivoConfig {
    /// Base URL including the version segment (no trailing slash)
    pub base_url: String,
    /// Value sent in the `x-rapidapi-host` header
    pub host: String,
    /// RapidAPI key; live calls are refused without it
    pub api_key: Option<String>,
    /// Caller id presented to the destination
    pub caller_id: Option<String>,
    /// Gateway string passed through to Eqivo
    pub gateways: String,
    /// URL Eqivo fetches call instructions from once answered
    pub answer_url: String,
    /// Optional hangup callback URL
    pub hangup_url: Option<String>,
    /// Optional ring callback URL
    pub ring_url: Option<String>,
    /// Optional maximum call duration in seconds
    pub time_limit: Option<String>,
    /// Optional "hang up on ring" flag, passed through verbatim
    pub hangup_on_ring: Option<String>,
    /// Timeout applied to each HTTP request, in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for EqivoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EQIVO_BASE_URL.to_string(),
            host: DEFAULT_EQIVO_HOST.to_string(),
            api_key: None,
            caller_id: None,
            gateways: "user/".to_string(),
            answer_url: "https://demo.eqivo.org/answer.xml".to_string(),
            hangup_url: None,
            ring_url: None,
            time_limit: None,
            hangup_on_ring: None,
            request_timeout_ms: 10_000,
        }
    }
}

impl EqivoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at a different API root (used by tests and proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_caller_id(mut self, caller_id: impl Into<String>) -> Self {
        self.caller_id = Some(caller_id.into());
        self
    }

    pub fn with_gateways(mut self, gateways: impl Into<String>) -> Self {
        self.gateways = gateways.into();
        self
    }

    pub fn with_answer_url(mut self, answer_url: impl Into<String>) -> Self {
        self.answer_url = answer_url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// The API key, treating blank values as absent
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// The configured caller id, treating blank values as absent
    pub fn caller_id(&self) -> Option<&str> {
        self.caller_id.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// Settings for the simulated provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Artificial delay before a simulated call is "placed"
    pub place_latency_ms: u64,
    /// Artificial delay before a simulated status query answers
    pub query_latency_ms: u64,
    /// Caller id used when none is configured in simulated mode
    pub caller_id: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            place_latency_ms: 500,
            query_latency_ms: 200,
            caller_id: "MOCK-CALLER-123".to_string(),
        }
    }
}

impl SimulationConfig {
    /// No artificial latency at all
    pub fn instant() -> Self {
        Self {
            place_latency_ms: 0,
            query_latency_ms: 0,
            ..Self::default()
        }
    }

    pub fn place_latency(&self) -> Duration {
        Duration::from_millis(self.place_latency_ms)
    }

    pub fn query_latency(&self) -> Duration {
        Duration::from_millis(self.query_latency_ms)
    }
}
