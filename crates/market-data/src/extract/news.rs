use std::collections::BTreeMap;

use chrono::{Local, TimeZone, Utc};
use serde_json::Value;

use crate::models::{NewsPoint, NewsRow};
use crate::numeric::unix_seconds;

const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One table row per array element. Anything but an array yields nothing.
pub fn extract_news(doc: &Value) -> Vec<NewsRow> {
    let Some(items) = doc.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| NewsRow {
            time: published_at(item)
                .and_then(|secs| Local.timestamp_opt(secs, 0).single())
                .map(|t| t.format(LOCAL_TIME_FORMAT).to_string())
                .unwrap_or_default(),
            headline: text_field(item, "headline"),
            source: text_field(item, "source"),
            summary: text_field(item, "summary"),
            url: text_field(item, "url"),
        })
        .collect()
}

/// Article count per UTC day, ascending by day.
pub fn news_per_day(doc: &Value) -> Vec<NewsPoint> {
    let Some(items) = doc.as_array() else {
        return Vec::new();
    };

    let mut days: BTreeMap<String, u32> = BTreeMap::new();
    for secs in items.iter().filter_map(published_at) {
        if let Some(day) = Utc.timestamp_opt(secs, 0).single() {
            *days.entry(day.format("%Y-%m-%d").to_string()).or_default() += 1;
        }
    }

    days.into_iter().map(|(x, y)| NewsPoint { x, y }).collect()
}

/// `datetime` in unix seconds; zero counts as unset.
fn published_at(item: &Value) -> Option<i64> {
    item.get("datetime")
        .and_then(unix_seconds)
        .filter(|secs| *secs != 0)
}

fn text_field(item: &Value, key: &str) -> String {
    match item.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
