// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - GET /mentions parameter validation (400s)
// - GET /mentions with an unset provider credential (500 + source in body)

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use mention_aggregator::aggregator::Aggregator;
use mention_aggregator::api::{self, AppState};
use mention_aggregator::config::Config;
use mention_aggregator::rate_limit::MemoryCounterStore;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

/// Build the same Router the binary uses, with no credentials configured.
fn test_router() -> Router {
    let config = Config::default();
    let aggregator = Arc::new(Aggregator::new(&config, Arc::new(MemoryCounterStore::new())));
    api::router(AppState { aggregator })
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let v: Json = serde_json::from_slice(&bytes).unwrap_or(Json::Null);
    (status, v)
}

#[tokio::test]
async fn health_returns_200_and_ok_body() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    assert_eq!(String::from_utf8(bytes).expect("utf8").trim(), "ok");
}

#[tokio::test]
async fn missing_parameters_return_400() {
    for uri in [
        "/mentions",
        "/mentions?source=video",
        "/mentions?query=acme",
        "/mentions?source=video&query=",
        "/mentions?source=&query=acme",
    ] {
        let (status, v) = get_json(test_router(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {uri}");
        let msg = v["error"].as_str().expect("error message");
        assert!(msg.contains("required"), "uri: {uri}, error: {msg}");
        assert!(v.get("timestamp").is_some(), "error body has timestamp");
    }
}

#[tokio::test]
async fn unknown_source_returns_400_before_any_lookup() {
    let (status, v) = get_json(test_router(), "/mentions?source=twitter&query=acme").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let msg = v["error"].as_str().expect("error message");
    assert!(msg.contains("invalid source"), "got: {msg}");
    assert!(msg.contains("twitter"), "got: {msg}");
}

#[tokio::test]
async fn video_without_credential_returns_500_with_source() {
    let (status, v) = get_json(test_router(), "/mentions?source=video&query=acme").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(v["source"], "video");
    let msg = v["error"].as_str().expect("error message");
    assert!(
        msg.contains("YOUTUBE_API_KEY"),
        "error should name the missing credential, got: {msg}"
    );
}

#[tokio::test]
async fn web_without_credential_returns_500_with_source() {
    let (status, v) = get_json(test_router(), "/mentions?source=web&query=acme").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(v["source"], "web");
    assert!(v["error"].as_str().unwrap_or_default().contains("SERPAPI_KEY"));
}
