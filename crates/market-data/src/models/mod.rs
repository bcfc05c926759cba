//! Market data models
//!
//! - `types` - Provider identifiers
//! - `candle` - Canonical OHLCV record produced by the provider adapters
//! - `series` - Rows produced by the generic extractor (series and news)
//! - `request` - Gateway request shape

mod candle;
mod request;
mod series;
mod types;

pub use candle::Candle;
pub(crate) use candle::sort_candles;
pub use request::{GatewayRequest, RequestIntent};
pub use series::{NewsPoint, NewsRow, SeriesRow};
pub use types::ProviderId;
