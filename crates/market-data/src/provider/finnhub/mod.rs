//! Finnhub market data provider implementation.
//!
//! The widget `endpoint` is a path under the v1 API (`/quote`,
//! `/stock/candle`, `/company-news`, ...). Two response shapes are
//! normalized into candles:
//! - `/stock/candle`: parallel `t,o,h,l,c,v` arrays
//! - `/quote`: scalar `o,h,l,c,t`
//!
//! Finnhub free tier is limited to 60 API calls per minute.
//! API documentation: https://finnhub.io/docs/api

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::{sort_candles, Candle, ProviderId};
use crate::numeric::{finite_number, finite_opt, unix_seconds};
use crate::provider::http::{build_client, decode_response, transport_error, DEFAULT_TIMEOUT};
use crate::provider::MarketDataProvider;

pub const BASE_URL: &str = "https://finnhub.io/api/v1";
const PROVIDER: ProviderId = ProviderId::Finnhub;

/// Finnhub market data provider.
pub struct FinnhubProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FinnhubProvider {
    /// Create a new Finnhub provider with the given API key.
    pub fn new(api_key: String) -> Self {
        Self {
            client: build_client(DEFAULT_TIMEOUT),
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the provider at another API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    /// Join the API root and an endpoint, adding the leading `/` if missing.
    fn endpoint_url(&self, endpoint: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if endpoint.starts_with('/') {
            format!("{}{}", base, endpoint)
        } else {
            format!("{}/{}", base, endpoint)
        }
    }
}

#[async_trait]
impl MarketDataProvider for FinnhubProvider {
    fn id(&self) -> ProviderId {
        PROVIDER
    }

    async fn fetch_raw(
        &self,
        endpoint: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<Value, MarketDataError> {
        let url = self.endpoint_url(endpoint);

        debug!("Finnhub request: {} with {} params", endpoint, params.len());

        // API key as header keeps it out of URLs and logs
        let response = self
            .client
            .get(&url)
            .header("X-Finnhub-Token", &self.api_key)
            .query(params)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        decode_response(PROVIDER, response).await
    }
}

// ============================================================================
// Adapters
// ============================================================================

/// Convert a `/stock/candle` document into candles.
///
/// Index `i` is kept only when `o,h,l,c` are all finite and `t` is numeric.
/// The result is sorted by time; equal timestamps keep their input order.
pub fn adapt_finnhub_candle(json: &Value) -> Vec<Candle> {
    let column = |key: &str| json.get(key).and_then(Value::as_array);

    let (Some(t), Some(o), Some(h), Some(l), Some(c)) = (
        column("t"),
        column("o"),
        column("h"),
        column("l"),
        column("c"),
    ) else {
        return Vec::new();
    };
    let v = column("v");

    let mut candles: Vec<Candle> = t
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            let time = unix_seconds(ts)?;
            let open = finite_opt(o.get(i))?;
            let high = finite_opt(h.get(i))?;
            let low = finite_opt(l.get(i))?;
            let close = finite_opt(c.get(i))?;
            let volume = v.and_then(|v| finite_opt(v.get(i)));
            Some(Candle::new(time, open, high, low, close).with_volume(volume))
        })
        .collect();

    sort_candles(&mut candles);
    candles
}

/// Convert a `/quote` document into at most one candle.
///
/// A missing or non-numeric `t` is replaced by the current time.
pub fn adapt_finnhub_quote(json: &Value) -> Vec<Candle> {
    let field = |key: &str| json.get(key).and_then(finite_number);

    let (Some(open), Some(high), Some(low), Some(close)) =
        (field("o"), field("h"), field("l"), field("c"))
    else {
        return Vec::new();
    };

    let time = json
        .get("t")
        .and_then(unix_seconds)
        .unwrap_or_else(|| Utc::now().timestamp());

    vec![Candle::new(time, open, high, low, close)]
}
