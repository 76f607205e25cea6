//! Integration test — build the router with the real client, call /health,
//! assert response. The assistant service is never contacted.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use relay_api::AppState;
use relay_api::config::ApiConfig;
use relay_core::AssistantConfig;
use tower::ServiceExt;

#[tokio::test]
async fn health_endpoint_returns_expected_shape() {
    // Unroutable API root: health must not depend on the assistant service.
    let mut assistant = AssistantConfig::new("sk-unused");
    assistant.base_url = "http://127.0.0.1:9/v1".parse().expect("url");
    let state = AppState::new(ApiConfig::new("127.0.0.1:0", assistant)).expect("state");

    let app = relay_api::router(state);

    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.expect("request");

    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");

    let json: serde_json::Value = serde_json::from_slice(&body).expect("parse JSON");

    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "assistant-relay");
    assert_eq!(json["version"], relay_core::version());

    let timestamp = json["timestamp"].as_str().expect("timestamp is string");
    assert!(
        chrono::DateTime::parse_from_rfc3339(timestamp).is_ok(),
        "timestamp is not RFC 3339: {timestamp}"
    );
}

#[tokio::test]
async fn cors_preflight_is_allowed() {
    let state = AppState::new(ApiConfig::new(
        "127.0.0.1:0",
        AssistantConfig::new("sk-unused"),
    ))
    .expect("state");
    let app = relay_api::router(state);

    let req = Request::builder()
        .method("OPTIONS")
        .uri("/chat")
        .header("origin", "http://localhost:8081")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.expect("request");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
