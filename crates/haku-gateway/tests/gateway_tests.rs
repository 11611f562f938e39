// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway routes exercised in-process with `tower::ServiceExt::oneshot`.

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use haku_core::ProviderErrorKind;
use haku_gateway::{GatewayState, router};
use haku_test_utils::{TestHarness, TestHarnessBuilder};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(
    builder: TestHarnessBuilder,
    method: &str,
    uri: &str,
    body: Value,
) -> (StatusCode, Value) {
    let harness = builder.build().unwrap();
    let app = router(GatewayState::new(harness.pipeline));

    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = if method == "GET" {
        request.body(Body::empty()).unwrap()
    } else {
        request.body(Body::from(body.to_string())).unwrap()
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_lists_engines() {
    let (status, body) = send(TestHarness::builder(), "GET", "/health", Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(
        body["engines"],
        json!(["claude", "gemini", "gpt", "grok", "ollama"])
    );
}

#[tokio::test]
async fn chat_returns_payload() {
    let builder = TestHarness::builder().with_response("grok", "Scaffolded the landing page.");
    let (status, body) = send(
        builder,
        "POST",
        "/v1/chat",
        json!({ "message": "Build the landing page" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Scaffolded the landing page.");
    assert_eq!(body["ai_engine"], "grok");
    assert_eq!(body["privacy_tier"], 0);
    assert_eq!(body["task_class"], "execution");
    assert_eq!(body["mode"], "executing");
    assert_eq!(body["validation_status"], "approved");
    assert_eq!(body["heritage_context_used"], false);
}

#[tokio::test]
async fn sensitivity_hint_raises_tier() {
    let (status, body) = send(
        TestHarness::builder(),
        "POST",
        "/v1/route",
        json!({ "message": "Summarize the notes", "sensitivity": 3 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["privacy_tier"], 3);
    assert_eq!(body["ai_engine"], "ollama");
    assert_eq!(body["local_only"], true);
}

#[tokio::test]
async fn route_reports_decision_without_invoking() {
    let (status, body) = send(
        TestHarness::builder().with_failure("claude", ProviderErrorKind::Api),
        "POST",
        "/v1/route",
        json!({ "message": "Verify the invoice totals" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task_class"], "validation");
    assert_eq!(body["organ"], "conscience");
    assert_eq!(body["ai_engine"], "claude");
    assert_eq!(body["local_only"], false);
    assert!(body["rationale"].as_str().unwrap().contains("conscience"));
    assert!(body.get("agent").is_none());
}

#[tokio::test]
async fn validate_returns_result() {
    let (status, body) = send(
        TestHarness::builder(),
        "POST",
        "/v1/validate",
        json!({ "text": "This is definitely guaranteed to work" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "blocked");
    assert_eq!(body["issues"][0]["kind"], "false_certainty");
}

#[tokio::test]
async fn merge_returns_synthesis_payload() {
    let (status, body) = send(
        TestHarness::builder(),
        "POST",
        "/v1/merge",
        json!({ "message": "Should we expand to Europe?" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ai_engine"], "claude");
    assert_eq!(body["response"], "mock response from claude");
}

#[tokio::test]
async fn provider_failure_is_bad_gateway() {
    let (status, body) = send(
        TestHarness::builder().with_failure("grok", ProviderErrorKind::Authentication),
        "POST",
        "/v1/chat",
        json!({ "message": "Build the landing page" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("authentication"));
}

#[tokio::test]
async fn blank_message_is_bad_request() {
    let (status, body) = send(
        TestHarness::builder(),
        "POST",
        "/v1/chat",
        json!({ "message": "  " }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "message must not be empty");
}
