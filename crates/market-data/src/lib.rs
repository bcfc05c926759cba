//! FinBoard Market Data Crate
//!
//! Provider plumbing and pure data shaping for the FinBoard dashboard.
//!
//! # Overview
//!
//! - Gateway: credential injection and request forwarding to Alpha Vantage
//!   and Finnhub, returning raw JSON
//! - Adapters: pure functions turning provider documents into [`Candle`]s
//! - Extractor: lenient series/news extraction for the detail view
//! - Path resolution and field formatting for widget mappings
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  GatewayRequest  | --> | ProviderGateway  |  (credential check)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    Provider      |  (Alpha Vantage, Finnhub)
//!                          +------------------+
//!                                  |
//!                                  v  raw JSON
//!                 +----------------+----------------+
//!                 v                                 v
//!         +----------------+               +----------------+
//!         | normalize_from |               |   extract_*    |
//!         +----------------+               +----------------+
//!                 |                                 |
//!                 v                                 v
//!             Vec<Candle>                 SeriesRow / NewsRow
//! ```
//!
//! Only the gateway can fail. Everything downstream of the raw document is
//! total: unknown shapes produce empty output.

pub mod errors;
pub mod extract;
pub mod format;
pub mod json_path;
pub mod models;
pub mod numeric;
pub mod provider;
pub mod registry;

pub use errors::MarketDataError;
pub use models::{Candle, GatewayRequest, NewsPoint, NewsRow, ProviderId, RequestIntent, SeriesRow};

pub use extract::{
    build_detail, classify, extract_news, extract_series, news_per_day, ResponseShape,
    SeriesSummary, WidgetDetail,
};
pub use format::{format_number, format_value, FieldFormat, PLACEHOLDER};
pub use json_path::{leaf_paths, resolve};

pub use provider::alpha_vantage::{adapt_alpha_vantage_daily, AlphaVantageProvider};
pub use provider::finnhub::{adapt_finnhub_candle, adapt_finnhub_quote, FinnhubProvider};
pub use provider::MarketDataProvider;

pub use registry::{
    normalize, normalize_from, AdapterKind, DataGateway, GatewayConfig, ProviderGateway,
};
