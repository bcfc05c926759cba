use serde::Serialize;
use serde_json::Value;

use super::classify::{classify, ResponseShape};
use super::news::{extract_news, news_per_day};
use super::series::extract_series;
use super::summary::SeriesSummary;
use crate::models::{NewsPoint, NewsRow, ProviderId, SeriesRow};

const NEWS_ENDPOINTS: [&str; 2] = ["news", "company-news"];

/// Full-page view of one widget's data.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WidgetDetail {
    News {
        rows: Vec<NewsRow>,
        points: Vec<NewsPoint>,
    },
    Series {
        rows: Vec<SeriesRow>,
        summary: SeriesSummary,
    },
}

/// Whether a widget endpoint returns a Finnhub news feed. The leading `/`
/// is optional, as it is for the gateway.
pub fn is_news_endpoint(provider: ProviderId, endpoint: &str) -> bool {
    let path = endpoint.trim().trim_start_matches('/');
    provider == ProviderId::Finnhub && NEWS_ENDPOINTS.contains(&path)
}

/// News when the document is an article feed, or when the endpoint is a
/// known news endpoint (so an empty feed still renders as news).
pub fn build_detail(provider: ProviderId, endpoint: &str, doc: &Value) -> WidgetDetail {
    let is_feed = matches!(classify(doc), ResponseShape::News(_));
    if is_feed || is_news_endpoint(provider, endpoint) {
        return WidgetDetail::News {
            rows: extract_news(doc),
            points: news_per_day(doc),
        };
    }

    let rows = extract_series(doc);
    let summary = SeriesSummary::from_rows(&rows);
    WidgetDetail::Series { rows, summary }
}
