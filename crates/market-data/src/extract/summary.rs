use serde::Serialize;

use crate::format::round2;
use crate::models::SeriesRow;

/// Latest-vs-previous analytics over ascending series rows.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    pub latest: Option<SeriesRow>,
    pub previous: Option<SeriesRow>,
    /// `latest.close - previous.close`.
    pub change: Option<f64>,
    /// `change / previous.close * 100`, rounded to two decimals. `None` when
    /// the previous close is zero.
    pub change_pct: Option<f64>,
}

impl SeriesSummary {
    pub fn from_rows(rows: &[SeriesRow]) -> Self {
        let latest = rows.last().cloned();
        let previous = rows.len().checked_sub(2).and_then(|i| rows.get(i)).cloned();

        let latest_close = latest.as_ref().and_then(|r| r.close);
        let previous_close = previous.as_ref().and_then(|r| r.close);

        let change = match (latest_close, previous_close) {
            (Some(last), Some(prev)) => Some(last - prev),
            _ => None,
        };
        let change_pct = match (change, previous_close) {
            (Some(change), Some(prev)) if prev != 0.0 => round2(change / prev * 100.0),
            _ => None,
        };

        Self {
            latest,
            previous,
            change,
            change_pct,
        }
    }
}
