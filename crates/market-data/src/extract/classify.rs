use serde_json::{Map, Value};

/// The recognized shapes of a raw provider document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResponseShape<'a> {
    /// Finnhub-style parallel arrays (`t`, `c`, ...).
    Candle(&'a Map<String, Value>),
    /// The object found under a `... Time Series ...` key, keyed by date.
    Series(&'a Map<String, Value>),
    /// An array of articles carrying a `datetime` field.
    News(&'a [Value]),
    Unrecognized,
}

/// Sniff the shape of `doc`. Checks run candle, series, news, in that order.
pub fn classify(doc: &Value) -> ResponseShape<'_> {
    match doc {
        Value::Object(map) => {
            let is_array = |key: &str| map.get(key).is_some_and(Value::is_array);
            if is_array("t") && is_array("c") {
                return ResponseShape::Candle(map);
            }

            map.iter()
                .find(|(key, _)| key.to_ascii_lowercase().contains("time series"))
                .and_then(|(_, value)| value.as_object())
                .map(ResponseShape::Series)
                .unwrap_or(ResponseShape::Unrecognized)
        }
        Value::Array(items) if items.iter().any(|item| item.get("datetime").is_some()) => {
            ResponseShape::News(items)
        }
        _ => ResponseShape::Unrecognized,
    }
}
