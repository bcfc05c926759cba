use serde::{Deserialize, Serialize};

/// Canonical OHLCV record for one time bucket.
///
/// `time` is unix seconds. Adapters emit candles sorted ascending by time;
/// candles sharing a timestamp are kept as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: Option<f64>) -> Self {
        self.volume = volume;
        self
    }
}

/// Sort candles ascending by time, keeping the input order of equal timestamps.
pub(crate) fn sort_candles(candles: &mut [Candle]) {
    candles.sort_by_key(|c| c.time);
}
