#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    extract::{Query, State},
    http::{HeaderMap, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use finboard_server::{api::app_router, build_state, config::Config};
use serde_json::{json, Value};
use tower::ServiceExt;

pub struct Upstream {
    pub alpha_vantage: Option<String>,
    pub finnhub: Option<String>,
}

impl Upstream {
    pub fn none() -> Self {
        Self {
            alpha_vantage: None,
            finnhub: None,
        }
    }
}

pub fn test_config(data_dir: &Path, upstream: Upstream) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        data_path: data_dir.join("dashboard.json"),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(5),
        dedupe_window: Duration::from_millis(5_000),
        alpha_vantage_key: upstream.alpha_vantage.as_ref().map(|_| "av-key".to_string()),
        finnhub_key: upstream.finnhub.as_ref().map(|_| "fh-key".to_string()),
        alpha_vantage_base_url: upstream.alpha_vantage,
        finnhub_base_url: upstream.finnhub,
    }
}

pub fn app(config: &Config) -> Router {
    let state = build_state(config).unwrap();
    app_router(state, config)
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

/// Stand-in for both providers, counting every request it serves.
///
/// Alpha Vantage lives under `/query`, Finnhub under `/api/v1`.
pub fn fake_providers(calls: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route("/query", get(alpha_vantage))
        .route("/api/v1/quote", get(finnhub_quote))
        .route("/api/v1/stock/candle", get(finnhub_candle))
        .route("/api/v1/company-news", get(finnhub_news))
        .route("/api/v1/slow", get(finnhub_slow))
        .with_state(calls)
}

pub async fn spawn_fake_providers() -> (Upstream, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let base = spawn_upstream(fake_providers(calls.clone())).await;
    let upstream = Upstream {
        alpha_vantage: Some(format!("{}/query", base)),
        finnhub: Some(format!("{}/api/v1", base)),
    };
    (upstream, calls)
}

async fn alpha_vantage(
    State(calls): State<Arc<AtomicUsize>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    calls.fetch_add(1, Ordering::SeqCst);
    if query.get("apikey").map(String::as_str) != Some("av-key") {
        return Json(json!({ "Error Message": "Invalid API call." })).into_response();
    }

    match query.get("function").map(String::as_str) {
        Some("TIME_SERIES_DAILY") => Json(json!({
            "Meta Data": {
                "2. Symbol": query.get("symbol").cloned().unwrap_or_default(),
                "5. Output Size": query.get("outputsize").cloned().unwrap_or_default()
            },
            "Time Series (Daily)": {
                "2024-01-03": { "1. open": "101", "2. high": "112", "3. low": "100", "4. close": "110", "5. volume": "900" },
                "2024-01-02": { "1. open": "99", "2. high": "101", "3. low": "98", "4. close": "100", "5. volume": "800" }
            }
        }))
        .into_response(),
        Some("LIMITED") => (StatusCode::TOO_MANY_REQUESTS, "slow down").into_response(),
        Some("TEXT") => "plain text body".into_response(),
        _ => Json(json!({})).into_response(),
    }
}

fn finnhub_authorized(headers: &HeaderMap) -> bool {
    headers
        .get("x-finnhub-token")
        .and_then(|v| v.to_str().ok())
        == Some("fh-key")
}

async fn finnhub_quote(State(calls): State<Arc<AtomicUsize>>, headers: HeaderMap) -> Response {
    calls.fetch_add(1, Ordering::SeqCst);
    if !finnhub_authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid API key" }))).into_response();
    }
    Json(json!({ "c": 187.5, "h": 188.0, "l": 185.2, "o": 186.0, "pc": 185.0, "t": 1704240000 }))
        .into_response()
}

async fn finnhub_candle(State(calls): State<Arc<AtomicUsize>>, headers: HeaderMap) -> Response {
    calls.fetch_add(1, Ordering::SeqCst);
    if !finnhub_authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "s": "ok",
        "t": [1704240000, 1704153600],
        "o": [101.0, 99.0],
        "h": [112.0, 101.0],
        "l": [100.0, 98.0],
        "c": [110.0, 100.0],
        "v": [900, 800]
    }))
    .into_response()
}

async fn finnhub_news(State(calls): State<Arc<AtomicUsize>>) -> Response {
    calls.fetch_add(1, Ordering::SeqCst);
    Json(json!([
        { "datetime": 1704240000, "headline": "Up", "source": "Wire", "related": "AAPL" },
        { "datetime": 1704153600, "headline": "Down", "source": "Wire", "related": "AAPL" }
    ]))
    .into_response()
}

/// Answers well after any short upstream timeout.
async fn finnhub_slow(State(calls): State<Arc<AtomicUsize>>) -> Response {
    calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!({ "c": 1.0 })).into_response()
}
