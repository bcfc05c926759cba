use chrono::{TimeZone, Utc};
use serde_json::{Map, Value};

use super::classify::{classify, ResponseShape};
use crate::models::SeriesRow;
use crate::numeric::{field_containing, finite_opt, unix_seconds};

/// Extract date-keyed rows from a candle or series document.
///
/// Unlike the provider adapters, rows are not filtered for completeness:
/// a missing or non-finite field is `None` and the row stays. Rows are
/// sorted ascending by date, ties keeping input order. Any other shape
/// yields no rows.
pub fn extract_series(doc: &Value) -> Vec<SeriesRow> {
    let mut rows = match classify(doc) {
        ResponseShape::Candle(map) => candle_rows(map),
        ResponseShape::Series(series) => series_rows(series),
        _ => return Vec::new(),
    };
    rows.sort_by(|a, b| a.date.cmp(&b.date));
    rows
}

fn candle_rows(map: &Map<String, Value>) -> Vec<SeriesRow> {
    let at = |key: &str, i: usize| finite_opt(map.get(key).and_then(|column| column.get(i)));

    let Some(times) = map.get("t").and_then(Value::as_array) else {
        return Vec::new();
    };

    times
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            let date = unix_seconds(ts)
                .and_then(|secs| Utc.timestamp_opt(secs, 0).single())?
                .format("%Y-%m-%d")
                .to_string();
            Some(SeriesRow {
                date,
                open: at("o", i),
                high: at("h", i),
                low: at("l", i),
                close: at("c", i),
                volume: at("v", i),
            })
        })
        .collect()
}

fn series_rows(series: &Map<String, Value>) -> Vec<SeriesRow> {
    series
        .iter()
        .map(|(date, row)| SeriesRow {
            date: date.clone(),
            open: finite_opt(field_containing(row, "open")),
            high: finite_opt(field_containing(row, "high")),
            low: finite_opt(field_containing(row, "low")),
            close: finite_opt(field_containing(row, "close")),
            volume: finite_opt(field_containing(row, "volume")),
        })
        .collect()
}
