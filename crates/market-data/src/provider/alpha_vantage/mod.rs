//! Alpha Vantage provider and response adapter.
//!
//! Requests go to a single query endpoint where the widget `endpoint` is
//! the `function` parameter (`TIME_SERIES_DAILY`, `GLOBAL_QUOTE`, ...).
//! The adapter understands the daily, intraday, weekly, monthly and digital
//! currency time series documents.
//!
//! Note: Alpha Vantage free tier is limited to 5 API calls per minute and
//! reports throttling in a `Note`/`Information` field with HTTP 200.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::{sort_candles, Candle, ProviderId};
use crate::numeric::{field_containing, finite_opt};
use crate::provider::http::{build_client, decode_response, transport_error, DEFAULT_TIMEOUT};
use crate::provider::MarketDataProvider;

pub const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER: ProviderId = ProviderId::AlphaVantage;

/// Parameters the provider sets itself; user values for them are ignored.
const RESERVED_PARAMS: [&str; 2] = ["function", "apikey"];

/// Series keys, in lookup priority order.
const SERIES_KEYS: [&str; 6] = [
    "Time Series (Daily)",
    "Time Series (Digital Currency Daily)",
    "Time Series (5min)",
    "Time Series (60min)",
    "Weekly Time Series",
    "Monthly Time Series",
];

/// Alpha Vantage market data provider.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageProvider {
    /// Create a new Alpha Vantage provider with the given API key.
    pub fn new(api_key: String) -> Self {
        Self {
            client: build_client(DEFAULT_TIMEOUT),
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the provider at another query URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    fn build_url(
        &self,
        function: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<reqwest::Url, MarketDataError> {
        let mut pairs: Vec<(&str, &str)> = vec![("function", function), ("apikey", &self.api_key)];
        for (key, value) in params {
            if RESERVED_PARAMS.contains(&key.to_ascii_lowercase().as_str()) {
                warn!("Ignoring reserved Alpha Vantage parameter '{}'", key);
                continue;
            }
            pairs.push((key, value));
        }

        reqwest::Url::parse_with_params(&self.base_url, &pairs).map_err(|e| {
            MarketDataError::ProviderError {
                provider: PROVIDER.to_string(),
                message: format!("Failed to build URL: {}", e),
            }
        })
    }
}

#[async_trait]
impl MarketDataProvider for AlphaVantageProvider {
    fn id(&self) -> ProviderId {
        PROVIDER
    }

    async fn fetch_raw(
        &self,
        endpoint: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<Value, MarketDataError> {
        let url = self.build_url(endpoint, params)?;

        debug!(
            "Alpha Vantage request: {}",
            url.as_str().replace(&self.api_key, "***")
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let doc = decode_response(PROVIDER, response).await?;
        log_api_notice(&doc);
        Ok(doc)
    }
}

/// Alpha Vantage reports throttling and bad calls in-band with HTTP 200.
/// The document is still returned as-is; this only surfaces it in the logs.
fn log_api_notice(doc: &Value) {
    for key in ["Error Message", "Note", "Information"] {
        if let Some(msg) = doc.get(key).and_then(Value::as_str) {
            warn!("Alpha Vantage {}: {}", key.to_ascii_lowercase(), msg);
        }
    }
}

// ============================================================================
// Adapter
// ============================================================================

/// Convert an Alpha Vantage time series document into candles.
///
/// Rows with any non-finite OHLC value, or an unparseable date, are
/// dropped. Returns an empty list when no known series key is present.
pub fn adapt_alpha_vantage_daily(json: &Value) -> Vec<Candle> {
    let Some(series) = find_series(json) else {
        return Vec::new();
    };

    let mut candles: Vec<Candle> = series
        .iter()
        .filter_map(|(date, row)| row_to_candle(date, row))
        .collect();
    sort_candles(&mut candles);
    candles
}

fn find_series(json: &Value) -> Option<&Map<String, Value>> {
    let map = json.as_object()?;
    SERIES_KEYS.iter().find_map(|known| {
        map.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(known))
            .and_then(|(_, value)| value.as_object())
    })
}

fn row_to_candle(date: &str, row: &Value) -> Option<Candle> {
    let time = parse_timestamp(date)?;
    let open = finite_opt(field_containing(row, "open"))?;
    let high = finite_opt(field_containing(row, "high"))?;
    let low = finite_opt(field_containing(row, "low"))?;
    let close = finite_opt(field_containing(row, "close"))?;
    let volume = finite_opt(field_containing(row, "volume"));

    Some(Candle::new(time, open, high, low, close).with_volume(volume))
}

/// Parse `YYYY-MM-DD` or `YYYY-MM-DD HH:MM[:SS]` as UTC unix seconds.
pub(crate) fn parse_timestamp(date_str: &str) -> Option<i64> {
    let trimmed = date_str.trim();
    let naive = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    Some(Utc.from_utc_datetime(&naive).timestamp())
}
