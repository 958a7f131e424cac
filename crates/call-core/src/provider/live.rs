//! Live provider backed by the Eqivo telephony API (via RapidAPI)
//!
//! Eqivo responses are loosely shaped: the same concept shows up under
//! several field names depending on API version and endpoint. Each response
//! type below documents, once, the ordered list of fields it reads and takes
//! the first one present.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use super::{CallLauncher, StatusProvider};
use crate::call::{Call, CallId, OutboundCall};
use crate::clock::{Clock, SystemClock};
use crate::config::EqivoConfig;
use crate::error::{CallError, CallResult};
use crate::status::CallStatus;

/// Body returned by `POST /Call/`
///
/// Call id fields, in priority order: `RequestUUID`, `CallUUID`,
/// `call_uuid`, `id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceCallResponse {
    #[serde(rename = "RequestUUID")]
    pub request_uuid: Option<String>,
    #[serde(rename = "CallUUID")]
    pub call_uuid: Option<String>,
    #[serde(rename = "call_uuid")]
    pub call_uuid_lower: Option<String>,
    pub id: Option<String>,
    #[serde(rename = "Message")]
    pub message: Option<String>,
    #[serde(rename = "Success")]
    pub success: Option<bool>,
}

impl PlaceCallResponse {
    /// First non-empty call id field
    pub fn call_id(&self) -> Option<CallId> {
        first_present([
            &self.request_uuid,
            &self.call_uuid,
            &self.call_uuid_lower,
            &self.id,
        ])
        .map(CallId::new)
    }
}

/// Body returned by `GET /Call/{id}/`
///
/// Status fields, in priority order: `CallStatus`, `status`, `call_status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallDetails {
    #[serde(rename = "CallUUID", skip_serializing_if = "Option::is_none")]
    pub call_uuid: Option<String>,
    #[serde(rename = "CallStatus", skip_serializing_if = "Option::is_none")]
    pub call_status: Option<String>,
    #[serde(rename = "status", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "call_status", skip_serializing_if = "Option::is_none")]
    pub call_status_lower: Option<String>,
    #[serde(rename = "Direction", skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(rename = "CallerName", skip_serializing_if = "Option::is_none")]
    pub caller_name: Option<String>,
    #[serde(rename = "CallerNumber", skip_serializing_if = "Option::is_none")]
    pub caller_number: Option<String>,
    #[serde(rename = "CalledNumber", skip_serializing_if = "Option::is_none")]
    pub called_number: Option<String>,
    #[serde(rename = "CallStartTime", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(rename = "CallAnswerTime", skip_serializing_if = "Option::is_none")]
    pub answer_time: Option<String>,
    #[serde(rename = "CallEndTime", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(
        rename = "CallDuration",
        default,
        deserialize_with = "lenient_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_secs: Option<u64>,
}

impl CallDetails {
    /// First non-empty raw status field
    pub fn raw_status(&self) -> Option<&str> {
        first_present([&self.call_status, &self.status, &self.call_status_lower])
    }

    /// Normalize the record into a canonical status
    ///
    /// A record without any status field is `unknown` when it still names the
    /// call, and malformed otherwise.
    pub fn normalized_status(&self) -> CallResult<CallStatus> {
        match self.raw_status() {
            Some(raw) => Ok(CallStatus::from_provider(raw)),
            None if first_present([&self.call_uuid]).is_some() => Ok(CallStatus::Unknown),
            None => Err(CallError::malformed("Call status not found in API response")),
        }
    }
}

/// Whole seconds from a number, a numeric string or null
///
/// Shapes that carry no usable duration read as absent rather than failing
/// the whole record.
fn lenient_secs<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = |value: f64| (value.is_finite() && value >= 0.0).then(|| value as u64);
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().and_then(secs)),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().and_then(secs),
        _ => None,
    })
}

fn first_present<'a, const N: usize>(fields: [&'a Option<String>; N]) -> Option<&'a str> {
    fields
        .into_iter()
        .filter_map(|field| field.as_deref())
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// Error body shapes seen on failures (`message` or `Message`)
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(rename = "Message")]
    message_upper: Option<String>,
}

impl ErrorBody {
    fn parse(text: &str) -> Option<String> {
        let body: ErrorBody = serde_json::from_str(text).ok()?;
        body.message.or(body.message_upper).filter(|m| !m.trim().is_empty())
    }
}

/// Status provider and call launcher for the live Eqivo API
pub struct EqivoProvider {
    client: Client,
    config: EqivoConfig,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for EqivoProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EqivoProvider")
            .field("base_url", &self.config.base_url)
            .field("host", &self.config.host)
            .finish()
    }
}

impl EqivoProvider {
    /// Build a provider; fails when no API key is configured
    pub fn new(config: EqivoConfig) -> CallResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: EqivoConfig, clock: Arc<dyn Clock>) -> CallResult<Self> {
        if config.api_key().is_none() {
            return Err(CallError::missing_credential(
                "RAPIDAPI_KEY is not set; the live telephony API requires it",
            ));
        }
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| CallError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config, clock })
    }

    pub fn config(&self) -> &EqivoConfig {
        &self.config
    }

    fn headers(&self, content_type: &'static str) -> CallResult<HeaderMap> {
        let api_key = self
            .config
            .api_key()
            .ok_or_else(|| CallError::missing_credential("RAPIDAPI_KEY is not set"))?;
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-rapidapi-key",
            HeaderValue::from_str(api_key)
                .map_err(|_| CallError::config("RAPIDAPI_KEY contains invalid header characters"))?,
        );
        headers.insert(
            "x-rapidapi-host",
            HeaderValue::from_str(&self.config.host)
                .map_err(|_| CallError::config("Eqivo host contains invalid header characters"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        Ok(headers)
    }

    /// `{base}/Call/{id}/` with the id encoded as a single path segment
    fn call_url(&self, call_id: &CallId) -> CallResult<Url> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| CallError::config(format!("invalid Eqivo base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| CallError::config("Eqivo base URL cannot carry a path"))?
            .pop_if_empty()
            .push("Call")
            .push(call_id.as_str().trim())
            .push("");
        Ok(url)
    }

    fn form_params(&self, request: &OutboundCall) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("To", request.destination.trim().to_string()),
            ("From", request.caller_id.trim().to_string()),
            ("Gateways", self.config.gateways.clone()),
            ("AnswerUrl", self.config.answer_url.clone()),
        ];
        let optional = [
            ("HangupUrl", &self.config.hangup_url),
            ("RingUrl", &self.config.ring_url),
            ("TimeLimit", &self.config.time_limit),
            ("HangupOnRing", &self.config.hangup_on_ring),
        ];
        for (name, value) in optional {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                params.push((name, value.to_string()));
            }
        }
        params
    }

    async fn fetch_details(&self, call_id: &CallId) -> CallResult<Result<CallDetails, StatusCode>> {
        if call_id.is_blank() {
            return Err(CallError::invalid_input("Call UUID is required"));
        }
        let response = self
            .client
            .get(self.call_url(call_id)?)
            .headers(self.headers("application/json")?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Ok(Err(status));
        }
        let details = response.json::<CallDetails>().await?;
        Ok(Ok(details))
    }

    /// Full status record of a call
    pub async fn call_details(&self, call_id: &CallId) -> CallResult<CallDetails> {
        match self.fetch_details(call_id).await? {
            Ok(details) => Ok(details),
            Err(StatusCode::NOT_FOUND) => Err(CallError::provider(Some(404), "Call not found")),
            Err(status) => {
                error!(call_id = %call_id, status = %status, "Fetch call details failed");
                Err(CallError::provider(
                    Some(status.as_u16()),
                    "Failed to get call details",
                ))
            }
        }
    }
}

#[async_trait]
impl StatusProvider for EqivoProvider {
    async fn query_status(&self, call_id: &CallId) -> CallResult<CallStatus> {
        match self.fetch_details(call_id).await? {
            Ok(details) => details.normalized_status(),
            // Calls disappear from the provider shortly after teardown
            Err(StatusCode::NOT_FOUND) => {
                debug!(call_id = %call_id, "Call not found at provider, treating as ended");
                Ok(CallStatus::Ended)
            }
            Err(status) => {
                error!(call_id = %call_id, status = %status, "Fetch call status failed");
                Err(CallError::provider(
                    Some(status.as_u16()),
                    format!("Failed to get call status (HTTP {})", status.as_u16()),
                ))
            }
        }
    }

    fn name(&self) -> &'static str {
        "eqivo"
    }
}

#[async_trait]
impl CallLauncher for EqivoProvider {
    async fn place_call(&self, request: &OutboundCall) -> CallResult<Call> {
        if request.destination.trim().is_empty() {
            return Err(CallError::invalid_input(
                "Destination phone number (to) is required",
            ));
        }
        if request.caller_id.trim().is_empty() {
            return Err(CallError::invalid_input("Caller ID (from) is required"));
        }

        let url = format!("{}/Call/", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .headers(self.headers("application/x-www-form-urlencoded")?)
            .form(&self.form_params(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(url = %url, status = %status, body = %body, "Call initiation failed");
            return Err(placement_error(status, ErrorBody::parse(&body)));
        }

        let body = response.json::<PlaceCallResponse>().await?;
        let call_id = body.call_id().ok_or_else(|| {
            CallError::malformed(format!(
                "API response did not contain a call UUID: {:?}",
                body
            ))
        })?;

        info!(call_id = %call_id, destination = %request.destination.trim(), "Outbound call placed");
        Ok(Call::initiated(
            call_id,
            request.destination.trim(),
            self.clock.now_millis(),
        ))
    }
}

/// User-facing message for a failed call placement
fn placement_error(status: StatusCode, provider_message: Option<String>) -> CallError {
    let code = Some(status.as_u16());
    match status {
        StatusCode::BAD_REQUEST => CallError::provider(
            code,
            format!(
                "Invalid request: {}",
                provider_message.unwrap_or_else(|| "Bad request".to_string())
            ),
        ),
        StatusCode::UNAUTHORIZED => {
            CallError::provider(code, "Authentication failed. Check your RAPIDAPI_KEY.")
        }
        StatusCode::NOT_FOUND => CallError::provider(
            code,
            "API endpoint not found. Please check the API version or endpoint path.",
        ),
        StatusCode::METHOD_NOT_ALLOWED => CallError::provider(code, "Method not allowed (405)"),
        other => CallError::provider(
            code,
            format!(
                "API request failed ({}): {}",
                other.as_u16(),
                provider_message.unwrap_or_else(|| other.to_string())
            ),
        ),
    }
}
