//! Response handling shared by the HTTP providers.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::ProviderId;

/// Default upstream request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Map a transport failure. The URL is stripped since it may carry a key.
pub(crate) fn transport_error(provider: ProviderId, error: reqwest::Error) -> MarketDataError {
    if error.is_timeout() {
        MarketDataError::Timeout {
            provider: provider.to_string(),
        }
    } else {
        MarketDataError::Network(error.without_url().to_string())
    }
}

/// Decode an upstream response into JSON.
///
/// 429 becomes [`MarketDataError::RateLimited`]. Any other status passes the
/// body through so the caller sees the provider's own error document.
pub(crate) async fn decode_response(
    provider: ProviderId,
    response: Response,
) -> Result<Value, MarketDataError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        warn!("{} rate limited the request", provider.label());
        return Err(MarketDataError::RateLimited {
            provider: provider.to_string(),
        });
    }

    if !status.is_success() {
        warn!("{} responded with HTTP {}", provider.label(), status);
    }

    let text = response
        .text()
        .await
        .map_err(|e| MarketDataError::ProviderError {
            provider: provider.to_string(),
            message: format!("Failed to read response: {}", e.without_url()),
        })?;

    Ok(decode_body(provider, text))
}

/// Parse a body as JSON, wrapping anything else as `{"raw": text}`.
pub(crate) fn decode_body(provider: ProviderId, text: String) -> Value {
    match serde_json::from_str::<Value>(&text) {
        Ok(value) => value,
        Err(e) => {
            debug!("{} returned a non-JSON body: {}", provider.label(), e);
            json!({ "raw": text })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_body_passes_json_through() {
        let value = decode_body(ProviderId::Finnhub, r#"{"c":1.5}"#.to_string());
        assert_eq!(value, json!({ "c": 1.5 }));

        let value = decode_body(ProviderId::Finnhub, "[1,2]".to_string());
        assert_eq!(value, json!([1, 2]));
    }

    #[test]
    fn test_decode_body_wraps_non_json() {
        let value = decode_body(ProviderId::AlphaVantage, "Service Unavailable".to_string());
        assert_eq!(value, json!({ "raw": "Service Unavailable" }));

        let value = decode_body(ProviderId::AlphaVantage, String::new());
        assert_eq!(value, json!({ "raw": "" }));
    }
}
