mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use axum::http::{Method, StatusCode};
use serde_json::json;
use tempfile::tempdir;

use common::{app, send, spawn_fake_providers, test_config, Upstream};

#[tokio::test]
async fn alpha_vantage_document_is_passed_through() {
    let tmp = tempdir().unwrap();
    let (upstream, _) = spawn_fake_providers().await;
    let app = app(&test_config(tmp.path(), upstream));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/proxy",
        Some(json!({
            "provider": "alphaVantage",
            "endpoint": "TIME_SERIES_DAILY",
            "params": { "symbol": "IBM", "outputsize": 5, "ignored": null }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Meta Data"]["2. Symbol"], "IBM");
    assert_eq!(body["Meta Data"]["5. Output Size"], "5");
    assert_eq!(body["Time Series (Daily)"]["2024-01-03"]["4. close"], "110");
}

#[tokio::test]
async fn finnhub_key_travels_in_header() {
    let tmp = tempdir().unwrap();
    let (upstream, _) = spawn_fake_providers().await;
    let app = app(&test_config(tmp.path(), upstream));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/proxy",
        Some(json!({ "provider": "finnhub", "endpoint": "quote", "params": { "symbol": "AAPL" } })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["c"], 187.5);
}

#[tokio::test]
async fn upstream_rate_limit_is_surfaced() {
    let tmp = tempdir().unwrap();
    let (upstream, _) = spawn_fake_providers().await;
    let app = app(&test_config(tmp.path(), upstream));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/proxy",
        Some(json!({ "provider": "alphaVantage", "endpoint": "LIMITED" })),
    )
    .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body, json!({ "error": "Rate limit exceeded", "status": 429 }));
}

#[tokio::test]
async fn non_json_upstream_body_is_wrapped() {
    let tmp = tempdir().unwrap();
    let (upstream, _) = spawn_fake_providers().await;
    let app = app(&test_config(tmp.path(), upstream));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/proxy",
        Some(json!({ "provider": "alphaVantage", "endpoint": "TEXT" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "raw": "plain text body" }));
}

#[tokio::test]
async fn missing_credential_fails_before_any_call() {
    let tmp = tempdir().unwrap();
    let (mut upstream, calls) = spawn_fake_providers().await;
    upstream.finnhub = None;
    let app = app(&test_config(tmp.path(), upstream));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/proxy",
        Some(json!({ "provider": "finnhub", "endpoint": "/quote" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Missing FINNHUB_API_KEY" }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn slow_upstream_times_out_before_the_server_does() {
    let tmp = tempdir().unwrap();
    let (upstream, _) = spawn_fake_providers().await;
    let mut config = test_config(tmp.path(), upstream);
    config.request_timeout = Duration::from_millis(300);
    assert!(config.server_timeout() > config.request_timeout);
    let app = app(&config);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/proxy",
        Some(json!({ "provider": "finnhub", "endpoint": "/slow" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Timeout: finnhub" }));
}

#[tokio::test]
async fn unknown_provider_is_a_bad_request() {
    let tmp = tempdir().unwrap();
    let app = app(&test_config(tmp.path(), Upstream::none()));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/proxy",
        Some(json!({ "provider": "yahoo", "endpoint": "/quote" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Unsupported provider" }));
}

#[tokio::test]
async fn unreadable_request_body_is_an_error() {
    let tmp = tempdir().unwrap();
    let app = app(&test_config(tmp.path(), Upstream::none()));

    let (status, body) = send(&app, Method::POST, "/api/proxy", Some(json!({ "endpoint": "/quote" }))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn preview_lists_leaf_paths() {
    let tmp = tempdir().unwrap();
    let (upstream, _) = spawn_fake_providers().await;
    let app = app(&test_config(tmp.path(), upstream));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/preview",
        Some(json!({ "provider": "finnhub", "endpoint": "/quote", "params": { "symbol": "AAPL" } })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pc"], 185.0);
    assert_eq!(body["paths"], json!(["c", "h", "l", "o", "pc", "t"]));
}
