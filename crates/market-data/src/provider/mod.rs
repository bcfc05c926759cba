//! Upstream market data providers.
//!
//! Each provider injects its credential, forwards the request and hands
//! back the raw JSON body. Turning that body into candles is the job of
//! the pure adapters living next to each provider, dispatched through
//! [`crate::registry::normalize_from`].

mod http;
mod traits;

pub mod alpha_vantage;
pub mod finnhub;

pub use http::DEFAULT_TIMEOUT;
pub use traits::MarketDataProvider;
