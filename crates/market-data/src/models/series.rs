use serde::{Deserialize, Serialize};

/// One row of a generically extracted time series.
///
/// Unlike [`Candle`](super::Candle), every numeric field is optional: the
/// extractor keeps rows with gaps instead of dropping them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    pub date: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

/// A company news article, flattened for table display.
///
/// Missing fields are empty strings, never omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsRow {
    pub time: String,
    pub headline: String,
    pub source: String,
    pub summary: String,
    pub url: String,
}

/// Number of articles published on one UTC day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsPoint {
    pub x: String,
    pub y: u32,
}
