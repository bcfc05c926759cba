//! Generic extraction for the widget detail view.
//!
//! Where the provider adapters produce strict candles for charts, the
//! extractor is lenient: it sniffs the document shape with [`classify`],
//! keeps rows with gaps, and handles Finnhub news feeds.

mod classify;
mod detail;
mod news;
mod series;
mod summary;

pub use classify::{classify, ResponseShape};
pub use detail::{build_detail, is_news_endpoint, WidgetDetail};
pub use news::{extract_news, news_per_day};
pub use series::extract_series;
pub use summary::SeriesSummary;
