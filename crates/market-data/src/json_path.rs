//! Dot-path addressing into arbitrary JSON documents.
//!
//! A path such as `"values.0.close"` is split on `.`; each segment is an
//! object key, or an index when the current value is an array. Object keys
//! may themselves contain dots (Alpha Vantage uses `"05. price"`): when a
//! plain segment misses, it is joined with the following segments and the
//! lookup retried. Missing branches resolve to `None` rather than an error.

use serde_json::Value;

/// Resolve `path` against `doc`.
///
/// An empty path returns the document itself. Traversal stops with `None`
/// as soon as a segment does not exist or the current value is a scalar.
///
/// ```
/// use serde_json::json;
/// use finboard_market_data::json_path::resolve;
///
/// let doc = json!({ "values": [{ "close": "187.5" }], "Global Quote": { "05. price": "1.5" } });
/// assert_eq!(resolve(&doc, "values.0.close"), Some(&json!("187.5")));
/// assert_eq!(resolve(&doc, "values.3.close"), None);
/// assert_eq!(resolve(&doc, "Global Quote.05. price"), Some(&json!("1.5")));
/// ```
pub fn resolve<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(doc);
    }

    let segments: Vec<&str> = path.split('.').collect();
    walk(doc, &segments)
}

fn walk<'a>(current: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    let Some(first) = segments.first() else {
        return Some(current);
    };

    match current {
        Value::Object(map) => {
            // Plain key first, then keys spanning more segments, shortest first.
            (1..=segments.len()).find_map(|end| {
                let child = if end == 1 {
                    map.get(*first)
                } else {
                    map.get(&segments[..end].join("."))
                }?;
                walk(child, &segments[end..])
            })
        }
        Value::Array(items) => first
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index))
            .and_then(|child| walk(child, &segments[1..])),
        _ => None,
    }
}

/// List every dot-path in `doc` that addresses a leaf, in traversal order.
///
/// Leaves are scalars and empty containers. Containers found at `max_depth`
/// are reported as a single path instead of being expanded. A scalar root
/// yields the empty path.
pub fn leaf_paths(doc: &Value, max_depth: usize) -> Vec<String> {
    let mut paths = Vec::new();
    collect_paths(doc, String::new(), 0, max_depth, &mut paths);
    paths
}

fn collect_paths(
    value: &Value,
    prefix: String,
    depth: usize,
    max_depth: usize,
    out: &mut Vec<String>,
) {
    let children: Vec<(String, &Value)> = match value {
        Value::Object(map) if !map.is_empty() && depth < max_depth => {
            map.iter().map(|(k, v)| (k.clone(), v)).collect()
        }
        Value::Array(items) if !items.is_empty() && depth < max_depth => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => {
            out.push(prefix);
            return;
        }
    };

    for (segment, child) in children {
        let path = if prefix.is_empty() {
            segment
        } else {
            format!("{}.{}", prefix, segment)
        };
        collect_paths(child, path, depth + 1, max_depth, out);
    }
}
