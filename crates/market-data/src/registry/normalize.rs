//! Provider/endpoint to adapter dispatch.
//!
//! Dispatch is a static table of `(provider, endpoint marker)` routes. A
//! request matching no route is treated as an Alpha Vantage document, so an
//! unknown Finnhub endpoint normalizes to nothing rather than an error.

use serde_json::Value;

use crate::models::{Candle, ProviderId};
use crate::provider::alpha_vantage::adapt_alpha_vantage_daily;
use crate::provider::finnhub::{adapt_finnhub_candle, adapt_finnhub_quote};

/// Which pure adapter turns a raw document into candles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdapterKind {
    AlphaVantageSeries,
    FinnhubCandle,
    FinnhubQuote,
}

impl AdapterKind {
    pub fn adapt(self, json: &Value) -> Vec<Candle> {
        match self {
            AdapterKind::AlphaVantageSeries => adapt_alpha_vantage_daily(json),
            AdapterKind::FinnhubCandle => adapt_finnhub_candle(json),
            AdapterKind::FinnhubQuote => adapt_finnhub_quote(json),
        }
    }
}

struct AdapterRoute {
    provider: ProviderId,
    /// Matched as a substring of the endpoint.
    endpoint_marker: &'static str,
    kind: AdapterKind,
}

const ROUTES: &[AdapterRoute] = &[
    AdapterRoute {
        provider: ProviderId::Finnhub,
        endpoint_marker: "/stock/candle",
        kind: AdapterKind::FinnhubCandle,
    },
    AdapterRoute {
        provider: ProviderId::Finnhub,
        endpoint_marker: "/quote",
        kind: AdapterKind::FinnhubQuote,
    },
];

const FALLBACK: AdapterKind = AdapterKind::AlphaVantageSeries;

/// Pick the adapter for a provider name (case-insensitive) and endpoint.
pub fn adapter_for(provider: &str, endpoint: &str) -> AdapterKind {
    match provider.parse::<ProviderId>() {
        Ok(id) => route(id, endpoint),
        Err(_) => FALLBACK,
    }
}

fn route(provider: ProviderId, endpoint: &str) -> AdapterKind {
    ROUTES
        .iter()
        .find(|r| r.provider == provider && endpoint.contains(r.endpoint_marker))
        .map(|r| r.kind)
        .unwrap_or(FALLBACK)
}

/// Normalize a raw provider document into candles. Never fails.
pub fn normalize_from(provider: &str, endpoint: &str, json: &Value) -> Vec<Candle> {
    adapter_for(provider, endpoint).adapt(json)
}

/// [`normalize_from`] for an already parsed provider.
pub fn normalize(provider: ProviderId, endpoint: &str, json: &Value) -> Vec<Candle> {
    route(provider, endpoint).adapt(json)
}
