//! Request handler behavior: validation, preflight, invocation discipline,
//! and cold-start retry bounds.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use mlstack::adapter::InferenceClient;
use mlstack::error::HandlerError;
use mlstack::runtime::{
    Cors, GenerateHandler, HttpRequest, HttpResponse, PingHandler, VoteHandler, PROBE_PAYLOAD,
};
use mlstack::store::{MemoryStore, ParameterStore, RetryPolicy};
use mlstack::testkit::{EchoInference, FlakyStore};

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        attempts: 3,
        delay: Duration::from_millis(1),
    }
}

async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store
        .put(&mlstack::domain::keys::endpoint_name(), "gpt2-endpoint")
        .await
        .unwrap();
    store
}

fn body_json(response: &HttpResponse) -> Value {
    serde_json::from_str(&response.body).expect("response body is JSON")
}

#[tokio::test]
async fn generate_invokes_exactly_once_and_returns_result_verbatim() {
    let store = seeded_store().await;
    let inference = EchoInference::new();
    let handler = GenerateHandler::initialize(
        &store,
        inference.clone(),
        fast_retry(),
        Duration::from_secs(5),
        Cors::permissive(),
    )
    .await
    .unwrap();

    let request = HttpRequest::post("/generate", r#"{"inputs": "hello world"}"#);
    let response = handler.handle(&request).await;

    assert_eq!(response.status, 200);
    assert_eq!(inference.calls(), 1);

    let body = body_json(&response);
    assert_eq!(body["endpoint"], "gpt2-endpoint");
    assert_eq!(body["echo"]["inputs"], "hello world");
}

#[tokio::test]
async fn generate_rejects_empty_inputs_without_invoking() {
    let store = seeded_store().await;
    let inference = EchoInference::new();
    let handler = GenerateHandler::initialize(
        &store,
        inference.clone(),
        fast_retry(),
        Duration::from_secs(5),
        Cors::permissive(),
    )
    .await
    .unwrap();

    for body in [r#"{"inputs": ""}"#, r#"{}"#, r#"{"inputs": 42}"#] {
        let response = handler.handle(&HttpRequest::post("/generate", body)).await;
        assert_eq!(response.status, 400, "body {body} should be rejected");
        assert_eq!(
            body_json(&response)["error"],
            "Missing or empty 'inputs' field."
        );
    }
    assert_eq!(inference.calls(), 0);
}

#[tokio::test]
async fn generate_rejects_unparseable_body() {
    let store = seeded_store().await;
    let inference = EchoInference::new();
    let handler = GenerateHandler::initialize(
        &store,
        inference.clone(),
        fast_retry(),
        Duration::from_secs(5),
        Cors::permissive(),
    )
    .await
    .unwrap();

    let response = handler
        .handle(&HttpRequest::post("/generate", "this is not json"))
        .await;
    assert_eq!(response.status, 400);
    assert_eq!(body_json(&response)["error"], "Invalid JSON payload.");
    assert_eq!(inference.calls(), 0);
}

#[tokio::test]
async fn preflight_short_circuits_before_validation() {
    let store = seeded_store().await;
    let inference = EchoInference::new();
    let handler = GenerateHandler::initialize(
        &store,
        inference.clone(),
        fast_retry(),
        Duration::from_secs(5),
        Cors::permissive(),
    )
    .await
    .unwrap();

    // A malformed body must not matter for OPTIONS.
    let mut request = HttpRequest::options("/generate");
    request.body = Some("{{{ definitely not json".into());
    let response = handler.handle(&request).await;

    assert_eq!(response.status, 200);
    assert_eq!(body_json(&response)["message"], "CORS preflight OK");
    assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
    assert_eq!(inference.calls(), 0);
}

#[tokio::test]
async fn generate_maps_upstream_failure_to_bad_gateway() {
    let store = seeded_store().await;
    let handler = GenerateHandler::initialize(
        &store,
        EchoInference::failing("model exploded"),
        fast_retry(),
        Duration::from_secs(5),
        Cors::permissive(),
    )
    .await
    .unwrap();

    let response = handler
        .handle(&HttpRequest::post("/generate", r#"{"inputs": "x"}"#))
        .await;
    assert_eq!(response.status, 502);
    let error = body_json(&response)["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Invocation failed:"), "got: {error}");
    assert!(error.contains("model exploded"));
}

/// Inference double that never completes within any reasonable budget.
struct StalledInference;

#[async_trait::async_trait]
impl InferenceClient for StalledInference {
    async fn invoke(&self, _: &str, _: &Value) -> Result<Value, HandlerError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(json!({}))
    }
}

#[tokio::test]
async fn generate_times_out_at_its_budget() {
    let store = seeded_store().await;
    let handler = GenerateHandler::initialize(
        &store,
        Arc::new(StalledInference),
        fast_retry(),
        Duration::from_millis(20),
        Cors::permissive(),
    )
    .await
    .unwrap();

    let response = handler
        .handle(&HttpRequest::post("/generate", r#"{"inputs": "x"}"#))
        .await;
    assert_eq!(response.status, 502);
    assert!(body_json(&response)["error"]
        .as_str()
        .unwrap()
        .contains("timed out"));
}

#[tokio::test]
async fn cold_start_retries_exactly_to_the_bound_then_fails_closed() {
    let flaky = FlakyStore::new(MemoryStore::new(), usize::MAX);
    let err = GenerateHandler::initialize(
        &flaky,
        EchoInference::new(),
        fast_retry(),
        Duration::from_secs(5),
        Cors::permissive(),
    )
    .await
    .unwrap_err();

    assert_eq!(flaky.attempts(), 3);
    assert_eq!(err.status(), 500);
    match err {
        HandlerError::Configuration(message) => {
            assert!(message.starts_with("Failed to fetch endpoint name:"));
        }
        other => panic!("expected configuration error, got {other}"),
    }
}

#[tokio::test]
async fn cold_start_survives_transient_failures_within_the_bound() {
    let inner = seeded_store().await;
    let flaky = FlakyStore::new(inner, 2);

    let handler = GenerateHandler::initialize(
        &flaky,
        EchoInference::new(),
        fast_retry(),
        Duration::from_secs(5),
        Cors::permissive(),
    )
    .await;

    assert!(handler.is_ok());
    assert_eq!(flaky.attempts(), 3);
}

#[tokio::test]
async fn ping_probes_with_the_fixed_payload() {
    let store = seeded_store().await;
    let inference = EchoInference::new();
    let handler = PingHandler::initialize(
        &store,
        inference.clone(),
        fast_retry(),
        Duration::from_secs(5),
        Cors::permissive(),
    )
    .await
    .unwrap();

    let response = handler.handle(&HttpRequest::get("/ping")).await;
    assert_eq!(response.status, 200);
    assert_eq!(inference.calls(), 1);

    let body = body_json(&response);
    assert_eq!(body["message"], "Ping successful");
    assert_eq!(body["result"]["echo"]["inputs"], PROBE_PAYLOAD);
}

#[tokio::test]
async fn ping_reports_upstream_failure_as_bad_gateway() {
    let store = seeded_store().await;
    let handler = PingHandler::initialize(
        &store,
        EchoInference::failing("endpoint is down"),
        fast_retry(),
        Duration::from_secs(5),
        Cors::permissive(),
    )
    .await
    .unwrap();

    let response = handler.handle(&HttpRequest::get("/ping")).await;
    assert_eq!(response.status, 502);
    assert!(body_json(&response)["error"]
        .as_str()
        .unwrap()
        .starts_with("Ping failed:"));
}

#[tokio::test]
async fn vote_acknowledges_a_string_vote() {
    let handler = VoteHandler::new(Cors::permissive());
    let response = handler
        .handle(&HttpRequest::post("/vote", r#"{"vote": "up"}"#))
        .await;

    assert_eq!(response.status, 200);
    assert_eq!(body_json(&response)["message"], "Vote received: up");
}

#[tokio::test]
async fn vote_acknowledges_an_absent_field_with_a_null_marker() {
    let handler = VoteHandler::new(Cors::permissive());
    let response = handler.handle(&HttpRequest::post("/vote", "{}")).await;

    assert_eq!(response.status, 200);
    assert_eq!(body_json(&response)["message"], "Vote received: null");
}

#[tokio::test]
async fn vote_treats_a_missing_body_as_empty() {
    let handler = VoteHandler::new(Cors::permissive());
    let mut request = HttpRequest::post("/vote", "");
    request.body = None;
    let response = handler.handle(&request).await;

    assert_eq!(response.status, 200);
    assert_eq!(body_json(&response)["message"], "Vote received: null");
}

#[tokio::test]
async fn vote_rejects_an_unreadable_body() {
    let handler = VoteHandler::new(Cors::permissive());
    let response = handler.handle(&HttpRequest::post("/vote", "not json")).await;

    assert_eq!(response.status, 400);
    let body = body_json(&response);
    assert_eq!(body["error"], "Invalid input format");
    assert!(body["details"].as_str().is_some());
}
