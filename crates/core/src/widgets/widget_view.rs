//! Projection of a fetched document through a widget mapping.

use finboard_market_data::numeric::finite_number;
use finboard_market_data::{format_value, resolve, Candle, FieldFormat};
use serde::Serialize;
use serde_json::Value;

use super::widgets_model::{CardMapping, LineMapping, TableMapping, Widget, WidgetMapping};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardField {
    pub path: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinePoint {
    pub x: Value,
    pub y: f64,
}

/// What a widget renders for one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WidgetView {
    Card { fields: Vec<CardField> },
    Table(TableView),
    Line { points: Vec<LinePoint> },
}

/// Project `doc` through the mapping of `widget`.
pub fn project_widget(widget: &Widget, doc: &Value) -> WidgetView {
    let candles = widget.candles(doc);
    project_with_candles(widget, doc, &candles)
}

/// Same as [`project_widget`] when the candles are already at hand.
pub fn project_with_candles(widget: &Widget, doc: &Value, candles: &[Candle]) -> WidgetView {
    match &widget.mapping {
        WidgetMapping::Card(mapping) => project_card(mapping, doc),
        WidgetMapping::Table(mapping) => WidgetView::Table(project_table(mapping, doc, candles)),
        WidgetMapping::Line(mapping) => project_line(mapping, doc, candles),
    }
}

fn project_card(mapping: &CardMapping, doc: &Value) -> WidgetView {
    let fields = mapping
        .paths
        .iter()
        .map(|path| CardField {
            path: path.clone(),
            label: path.rsplit('.').next().unwrap_or(path).to_string(),
            value: format_value(resolve(doc, path), mapping.format),
        })
        .collect();
    WidgetView::Card { fields }
}

fn project_table(mapping: &TableMapping, doc: &Value, candles: &[Candle]) -> TableView {
    let sources: Vec<Value> = match doc {
        Value::Array(items) => items.clone(),
        _ if !candles.is_empty() => candle_values(candles),
        _ => vec![doc.clone()],
    };

    let rows = sources
        .iter()
        .map(|row| {
            mapping
                .columns
                .iter()
                .map(|column| format_value(resolve(row, column), FieldFormat::Number))
                .collect()
        })
        .collect();

    TableView {
        columns: mapping.columns.clone(),
        rows,
    }
}

fn project_line(mapping: &LineMapping, doc: &Value, candles: &[Candle]) -> WidgetView {
    let sources: Vec<Value> = if !candles.is_empty() {
        candle_values(candles)
    } else {
        doc.as_array().cloned().unwrap_or_default()
    };

    let points = sources
        .iter()
        .filter_map(|source| {
            let y = resolve(source, &mapping.y).and_then(finite_number)?;
            let x = resolve(source, &mapping.x).cloned().unwrap_or(Value::Null);
            Some(LinePoint { x, y })
        })
        .collect();

    WidgetView::Line { points }
}

fn candle_values(candles: &[Candle]) -> Vec<Value> {
    candles
        .iter()
        .filter_map(|candle| serde_json::to_value(candle).ok())
        .collect()
}
