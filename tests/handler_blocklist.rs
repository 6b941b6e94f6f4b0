mod common;

use axum::{
    Router,
    routing::{get, post},
};
use axum_test::TestServer;
use bv_guard::api::handlers::{
    alive_handler, block_bv_handler, block_handler, health_handler, is_exist_handler,
    metrics_handler, remove_handler,
};
use bv_guard::domain::resolve_worker::run_resolve_worker;
use bv_guard::state::AppState;
use common::{ScriptedFetcher, wait_until};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn test_router(state: AppState) -> Router {
    Router::new()
        .route("/block", post(block_handler))
        .route("/remove", post(remove_handler))
        .route("/isExist", get(is_exist_handler))
        .route("/blockBV", get(block_bv_handler))
        .route("/ok", get(alive_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

#[tokio::test]
async fn test_block_then_query_then_remove() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _resolver) = common::create_test_state(&dir).await;
    let server = TestServer::new(test_router(state)).unwrap();

    // Not blocked yet.
    let response = server.get("/isExist").add_query_param("mid", "12345").await;
    response.assert_status_ok();
    response.assert_text("False");

    // Block it.
    let response = server
        .post("/block")
        .form(&json!({ "mid": "12345", "username": "uploader" }))
        .await;
    response.assert_status_ok();
    response.assert_text("OK");

    let response = server.get("/isExist").add_query_param("mid", "12345").await;
    response.assert_text("True");

    // Remove it again.
    let response = server.post("/remove").form(&json!({ "mid": "12345" })).await;
    response.assert_text("OK");

    let response = server.get("/isExist").add_query_param("mid", "12345").await;
    response.assert_text("False");
}

#[tokio::test]
async fn test_block_rejects_bad_mid() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _resolver) = common::create_test_state(&dir).await;
    let server = TestServer::new(test_router(state)).unwrap();

    let response = server.post("/block").form(&json!({ "mid": "12a45" })).await;
    response.assert_status_ok();
    response.assert_text("ERR1");

    // Missing mid entirely.
    let response = server.post("/block").form(&json!({ "username": "x" })).await;
    response.assert_text("ERR1");

    let response = server
        .get("/isExist")
        .add_query_param("mid", "not-a-mid")
        .await;
    response.assert_text("ERR1");
}

#[tokio::test]
async fn test_duplicate_block_and_unknown_remove_report_err2() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _resolver) = common::create_test_state(&dir).await;
    let server = TestServer::new(test_router(state)).unwrap();

    let response = server.post("/block").form(&json!({ "mid": "777" })).await;
    response.assert_text("OK");
    let response = server.post("/block").form(&json!({ "mid": "777" })).await;
    response.assert_text("ERR2");

    let response = server.post("/remove").form(&json!({ "mid": "888" })).await;
    response.assert_text("ERR2");
}

#[tokio::test]
async fn test_block_bv_before_and_after_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let (state, resolver) = common::create_test_state(&dir).await;
    let fetcher = Arc::new(ScriptedFetcher::new());
    fetcher.program("BV1xx", Ok(12345));
    tokio::spawn(run_resolve_worker(
        resolver.clone(),
        fetcher,
        Duration::from_millis(10),
    ));

    let server = TestServer::new(test_router(state)).unwrap();

    // A missing bv parameter keeps the legacy body.
    let response = server.get("/blockBV").await;
    response.assert_status_ok();
    response.assert_text("ERR bv");

    // Block the owner up front so resolution flips the verdict to True.
    server.post("/block").form(&json!({ "mid": "12345" })).await;

    // First poll schedules the lookup.
    let response = server.get("/blockBV").add_query_param("bv", "BV1xx").await;
    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["msg"], "just wait...");
    assert!(body.get("mid").is_none());

    wait_until(|| resolver.resolve("BV1xx").is_some()).await;

    // Later polls see the resolution and the blocklist verdict.
    let response = server.get("/blockBV").add_query_param("bv", "BV1xx").await;
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["msg"], "OK");
    assert_eq!(body["mid"], 12345);
    assert_eq!(body["result"], "True");
}

#[tokio::test]
async fn test_alive_and_health() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _resolver) = common::create_test_state(&dir).await;
    let server = TestServer::new(test_router(state)).unwrap();

    let response = server.get("/ok").await;
    response.assert_status_ok();
    response.assert_text("OK");

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"]["status"], "ok");
    assert_eq!(body["checks"]["resolver"]["status"], "ok");
}

#[tokio::test]
async fn test_health_stays_ok_with_resolver_backlog() {
    let dir = tempfile::tempdir().unwrap();
    let (state, resolver) = common::create_test_state(&dir).await;
    let server = TestServer::new(test_router(state)).unwrap();

    // No worker is running, so the queue only grows.
    for i in 0..20 {
        resolver.resolve(&format!("BV1q{i}"));
    }

    // The resolver check is informational; a backlog never degrades /health.
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["resolver"]["status"], "ok");
}

#[tokio::test]
async fn test_metrics_reflect_state() {
    let dir = tempfile::tempdir().unwrap();
    let (state, resolver) = common::create_test_state(&dir).await;
    let server = TestServer::new(test_router(state)).unwrap();

    server.post("/block").form(&json!({ "mid": "1" })).await;
    server.post("/block").form(&json!({ "mid": "2" })).await;
    resolver.resolve("BV1xx");

    let response = server.get("/metrics").await;
    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["blocked_users"], 2);
    assert_eq!(body["queue_depth"], 1);
    assert_eq!(body["pending"], 1);
    assert_eq!(body["cache_size"], 0);
    assert_eq!(body["attempt_count"], 0);
    assert_eq!(body["failure_count"], 0);
}
