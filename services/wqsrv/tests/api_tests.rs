//! API integration tests

#![allow(clippy::disallowed_methods)] // Integration test - unwrap is acceptable

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use clearflow_quality::{Clock, FixedClock};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;
use wqsrv::{create_router, AppState};

fn test_router() -> Router {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap(),
    ));
    create_router(AppState::with_clock("wqsrv", clock))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(&body.to_string())).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

#[tokio::test]
async fn test_health_check() {
    let app = test_router();
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "wqsrv");
}

#[tokio::test]
async fn test_reads_before_any_submission_are_absent() {
    let app = test_router();

    let (status, ph) = get(&app, "/api/ph").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ph, json!({"ph": null, "ts": null, "timestamp": null}));

    let (_, turbidity) = get(&app, "/api/turbidity").await;
    assert!(turbidity["turbidity"].is_null());
    assert!(turbidity["timestamp"].is_null());

    let (_, snapshot) = get(&app, "/api/water-quality").await;
    assert_eq!(snapshot["timestamp"], "2025-06-01T09:30:00.000Z");
    assert!(snapshot["ph"]["ph"].is_null());
}

#[tokio::test]
async fn test_post_ph_then_read() {
    let app = test_router();

    let (status, body) = post_json(&app, "/api/ph", json!({"ph": 7.0, "ts": 1717234200})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "pH data received");

    let (_, ph) = get(&app, "/api/ph").await;
    assert_eq!(ph["ph"].as_f64(), Some(7.0));
    assert_eq!(ph["ts"], 1717234200);
    assert_eq!(ph["timestamp"], "2025-06-01T09:30:00.000Z");
}

#[tokio::test]
async fn test_post_ph_rounds_value() {
    let app = test_router();
    post_json(&app, "/api/ph", json!({"ph": "6.789"})).await;
    let (_, ph) = get(&app, "/api/ph").await;
    assert_eq!(ph["ph"].as_f64(), Some(6.79));
}

#[tokio::test]
async fn test_invalid_ph_is_rejected() {
    let app = test_router();

    for body in [json!({}), json!({"ph": null}), json!({"ph": "abc"}), json!({"ph": true})] {
        let (status, response) = post_json(&app, "/api/ph", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["message"], "Invalid pH value");
    }

    let (status, response) = send(&app, "POST", "/api/ph", Some("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "Invalid pH value");

    let (_, ph) = get(&app, "/api/ph").await;
    assert!(ph["ph"].is_null());
}

#[tokio::test]
async fn test_turbidity_round_trip_with_status() {
    let app = test_router();

    let (status, body) = post_json(
        &app,
        "/api/turbidity",
        json!({"turbidity": 60.04, "status": "Cloudy", "ts": "dev-7"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Turbidity data received");

    let (_, turbidity) = get(&app, "/api/turbidity").await;
    assert_eq!(turbidity["turbidity"].as_f64(), Some(60.0));
    assert_eq!(turbidity["status"], "Cloudy");
    assert_eq!(turbidity["ts"], "dev-7");
}

#[tokio::test]
async fn test_turbidity_status_defaults_to_unknown() {
    let app = test_router();
    post_json(&app, "/api/turbidity", json!({"turbidity": 3})).await;
    let (_, turbidity) = get(&app, "/api/turbidity").await;
    assert_eq!(turbidity["status"], "Unknown");
}

#[tokio::test]
async fn test_invalid_turbidity_is_rejected() {
    let app = test_router();
    let (status, body) = post_json(&app, "/api/turbidity", json!({"turbidity": "murky"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid turbidity value");
}

#[tokio::test]
async fn test_quantities_are_isolated() {
    let app = test_router();
    post_json(&app, "/api/ph", json!({"ph": 7.2})).await;
    let (_, turbidity) = get(&app, "/api/turbidity").await;
    assert!(turbidity["turbidity"].is_null());
}

#[tokio::test]
async fn test_legacy_path_matches_canonical() {
    let app = test_router();

    let (status, body) = post_json(&app, "/api/data", json!({"ph": 8.123, "ts": "legacy"})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Data received");

    let (_, via_legacy) = get(&app, "/api/data").await;
    let (_, via_canonical) = get(&app, "/api/ph").await;
    assert_eq!(via_legacy, via_canonical);
    assert_eq!(via_canonical["ph"].as_f64(), Some(8.12));
}

#[tokio::test]
async fn test_legacy_invalid_ph_still_201_and_store_unchanged() {
    let app = test_router();
    post_json(&app, "/api/ph", json!({"ph": 7.5})).await;
    let (_, before) = get(&app, "/api/ph").await;

    let (status, body) = post_json(&app, "/api/data", json!({"ph": "not-a-number"})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Data received");

    let (status, _) = send(&app, "POST", "/api/data", Some("garbage")).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, after) = get(&app, "/api/ph").await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_assessment_acidic_with_clear_water() {
    let app = test_router();
    post_json(&app, "/api/ph", json!({"ph": 5.9})).await;
    post_json(&app, "/api/turbidity", json!({"turbidity": 3})).await;

    let (status, assessment) = get(&app, "/api/water-quality/assessment").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(assessment["overall"], "Attention Needed");
    assert_eq!(assessment["ph"]["label"], "Too Acidic");
    assert_eq!(assessment["turbidity"]["label"], "Clear Water");
    assert_eq!(assessment["recommendations"][0]["title"], "pH Neutralization");
}

#[tokio::test]
async fn test_assessment_waits_for_both_quantities() {
    let app = test_router();
    post_json(&app, "/api/turbidity", json!({"turbidity": 60})).await;

    let (_, assessment) = get(&app, "/api/water-quality/assessment").await;
    assert_eq!(assessment["overall"], "Waiting for data");
    assert_eq!(assessment["turbidity"]["label"], "Cloudy");
    assert_eq!(assessment["turbidity"]["safe"], false);
    assert_eq!(assessment["recommendations"], json!([]));
}

#[tokio::test]
async fn test_purification_catalog() {
    let app = test_router();
    let (status, methods) = get(&app, "/api/purification-methods").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(methods.as_array().unwrap().len(), 5);
    assert_eq!(methods[0]["method"], "Sedimentation");
}

#[tokio::test]
async fn test_unknown_route_is_404_json() {
    let app = test_router();
    let (status, body) = get(&app, "/api/nothing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("/api/nothing"));
}

#[tokio::test]
async fn test_cors_preflight_is_allowed() {
    let app = test_router();
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/ph")
        .header("origin", "http://dashboard.local")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert!(response.status().is_success());
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
