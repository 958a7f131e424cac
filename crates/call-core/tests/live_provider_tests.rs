//! Tests for the live Eqivo provider against a stubbed HTTP API

use std::sync::Arc;

use dialwatch_call_core::{
    CallError, CallId, CallLauncher, CallStatus, EqivoConfig, EqivoProvider, ManualClock,
    OutboundCall, StatusProvider,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NOW: i64 = 1_700_000_000_000;

/// Provider pointed at the mock server
async fn provider_for(server: &MockServer) -> EqivoProvider {
    let config = EqivoConfig::new()
        .with_base_url(format!("{}/v0.1", server.uri()))
        .with_api_key("test-key");
    EqivoProvider::with_clock(config, Arc::new(ManualClock::new(NOW))).unwrap()
}

async fn stub_status(server: &MockServer, call_id: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/v0.1/Call/{call_id}/")))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn status_query_sends_rapidapi_headers_and_maps_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0.1/Call/abc-123/"))
        .and(header("x-rapidapi-key", "test-key"))
        .and(header("x-rapidapi-host", "eqivo-telephony.p.rapidapi.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "CallUUID": "abc-123",
            "CallStatus": "in-progress"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let status = provider.query_status(&CallId::new("abc-123")).await.unwrap();
    assert_eq!(status, CallStatus::Answered);
}

#[tokio::test]
async fn status_query_is_case_insensitive() {
    let server = MockServer::start().await;
    stub_status(
        &server,
        "abc",
        ResponseTemplate::new(200).set_body_json(json!({ "status": "COMPLETED" })),
    )
    .await;

    let provider = provider_for(&server).await;
    assert_eq!(
        provider.query_status(&CallId::new("abc")).await.unwrap(),
        CallStatus::Ended
    );
}

#[tokio::test]
async fn unmapped_status_passes_through() {
    let server = MockServer::start().await;
    stub_status(
        &server,
        "abc",
        ResponseTemplate::new(200).set_body_json(json!({ "call_status": "queued" })),
    )
    .await;

    let provider = provider_for(&server).await;
    assert_eq!(
        provider.query_status(&CallId::new("abc")).await.unwrap(),
        CallStatus::Other("queued".to_string())
    );
}

#[tokio::test]
async fn known_call_without_status_is_unknown() {
    let server = MockServer::start().await;
    stub_status(
        &server,
        "abc",
        ResponseTemplate::new(200).set_body_json(json!({ "CallUUID": "abc" })),
    )
    .await;

    let provider = provider_for(&server).await;
    assert_eq!(
        provider.query_status(&CallId::new("abc")).await.unwrap(),
        CallStatus::Unknown
    );
}

#[tokio::test]
async fn not_found_is_treated_as_ended() {
    let server = MockServer::start().await;
    stub_status(&server, "gone", ResponseTemplate::new(404)).await;

    let provider = provider_for(&server).await;
    assert_eq!(
        provider.query_status(&CallId::new("gone")).await.unwrap(),
        CallStatus::Ended
    );
}

#[tokio::test]
async fn completed_call_with_string_duration_is_ended() {
    let server = MockServer::start().await;
    stub_status(
        &server,
        "done",
        ResponseTemplate::new(200).set_body_json(json!({
            "CallStatus": "completed",
            "CallDuration": "30"
        })),
    )
    .await;

    let provider = provider_for(&server).await;
    assert_eq!(
        provider.query_status(&CallId::new("done")).await.unwrap(),
        CallStatus::Ended
    );
    let details = provider.call_details(&CallId::new("done")).await.unwrap();
    assert_eq!(details.duration_secs, Some(30));
}

#[tokio::test]
async fn call_id_is_sent_as_one_encoded_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0.1/Call/a%2Fb%3Fc/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ringing" })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    assert_eq!(
        provider.query_status(&CallId::new("a/b?c")).await.unwrap(),
        CallStatus::Ringing
    );
}

#[tokio::test]
async fn server_errors_are_retryable_failures() {
    let server = MockServer::start().await;
    stub_status(
        &server,
        "abc",
        ResponseTemplate::new(503).set_body_json(json!({ "message": "maintenance" })),
    )
    .await;

    let provider = provider_for(&server).await;
    let err = provider.query_status(&CallId::new("abc")).await.unwrap_err();
    assert!(matches!(err, CallError::Provider { status: Some(503), .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn blank_call_id_is_rejected_without_a_request() {
    let server = MockServer::start().await;
    let provider = provider_for(&server).await;
    let err = provider.query_status(&CallId::new("  ")).await.unwrap_err();
    assert!(matches!(err, CallError::InvalidInput { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn place_call_posts_form_and_returns_initiated_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v0.1/Call/"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("To=5551234"))
        .and(body_string_contains("From=5550000"))
        .and(body_string_contains("Gateways=user%2F"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Message": "Call request made",
            "RequestUUID": "req-42",
            "Success": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let call = provider
        .place_call(&OutboundCall::new(" 5551234 ", "5550000"))
        .await
        .unwrap();

    assert_eq!(call.id, CallId::new("req-42"));
    assert_eq!(call.destination, "5551234");
    assert_eq!(call.status, CallStatus::Initiated);
    assert_eq!(call.created_at, NOW);
}

#[tokio::test]
async fn place_call_without_id_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v0.1/Call/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Success": true })))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let err = provider
        .place_call(&OutboundCall::new("5551234", "5550000"))
        .await
        .unwrap_err();
    assert!(matches!(err, CallError::MalformedResponse { .. }));
}

#[tokio::test]
async fn place_call_maps_auth_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v0.1/Call/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let err = provider
        .place_call(&OutboundCall::new("5551234", "5550000"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Authentication failed"));
}

#[tokio::test]
async fn place_call_validates_input_before_any_request() {
    let server = MockServer::start().await;
    let provider = provider_for(&server).await;

    let err = provider
        .place_call(&OutboundCall::new("   ", "5550000"))
        .await
        .unwrap_err();
    assert!(matches!(err, CallError::InvalidInput { .. }));

    let err = provider
        .place_call(&OutboundCall::new("5551234", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, CallError::InvalidInput { .. }));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn call_details_returns_full_record() {
    let server = MockServer::start().await;
    stub_status(
        &server,
        "abc",
        ResponseTemplate::new(200).set_body_json(json!({
            "CallUUID": "abc",
            "CallStatus": "completed",
            "Direction": "outbound",
            "CalledNumber": "5551234",
            "CallDuration": 37
        })),
    )
    .await;

    let provider = provider_for(&server).await;
    let details = provider.call_details(&CallId::new("abc")).await.unwrap();
    assert_eq!(details.direction.as_deref(), Some("outbound"));
    assert_eq!(details.called_number.as_deref(), Some("5551234"));
    assert_eq!(details.duration_secs, Some(37));
    assert_eq!(details.normalized_status().unwrap(), CallStatus::Ended);
}

#[tokio::test]
async fn call_details_not_found_is_an_error() {
    let server = MockServer::start().await;
    stub_status(&server, "gone", ResponseTemplate::new(404)).await;

    let provider = provider_for(&server).await;
    let err = provider.call_details(&CallId::new("gone")).await.unwrap_err();
    assert_eq!(err, CallError::provider(Some(404), "Call not found"));
}
