//! Widget domain models.

use std::collections::{BTreeMap, HashSet};

use finboard_market_data::{
    normalize, Candle, FieldFormat, GatewayRequest, ProviderId, RequestIntent,
};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::Error;

/// Poll interval used when a widget does not specify one.
pub const DEFAULT_REFRESH_MS: u64 = 60_000;

/// Label used when neither `title` nor `name` is given.
pub const UNTITLED_WIDGET: &str = "Untitled Widget";

/// Version written by [`DashboardExport`].
pub const EXPORT_VERSION: u32 = 1;

/// Visual rendering of a widget, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetType {
    Card,
    Table,
    Line,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMapping {
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default)]
    pub format: FieldFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMapping {
    #[serde(default)]
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineMapping {
    #[serde(default = "default_x")]
    pub x: String,
    #[serde(default = "default_y")]
    pub y: String,
}

impl Default for LineMapping {
    fn default() -> Self {
        Self {
            x: default_x(),
            y: default_y(),
        }
    }
}

fn default_x() -> String {
    "time".to_string()
}

fn default_y() -> String {
    "close".to_string()
}

/// Projection applied to fetched data. The variant is the widget type, so a
/// mapping can never disagree with it.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetMapping {
    Card(CardMapping),
    Table(TableMapping),
    Line(LineMapping),
}

impl WidgetMapping {
    pub fn widget_type(&self) -> WidgetType {
        match self {
            WidgetMapping::Card(_) => WidgetType::Card,
            WidgetMapping::Table(_) => WidgetType::Table,
            WidgetMapping::Line(_) => WidgetType::Line,
        }
    }

    /// Decode the `mapping` object of a widget of type `kind`.
    /// `null` is read as an empty object.
    pub fn from_value(kind: WidgetType, value: Value) -> serde_json::Result<Self> {
        let value = match value {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        Ok(match kind {
            WidgetType::Card => WidgetMapping::Card(serde_json::from_value(value)?),
            WidgetType::Table => WidgetMapping::Table(serde_json::from_value(value)?),
            WidgetType::Line => WidgetMapping::Line(serde_json::from_value(value)?),
        })
    }

    pub fn to_value(&self) -> Value {
        let encoded = match self {
            WidgetMapping::Card(m) => serde_json::to_value(m),
            WidgetMapping::Table(m) => serde_json::to_value(m),
            WidgetMapping::Line(m) => serde_json::to_value(m),
        };
        encoded.unwrap_or(Value::Null)
    }
}

/// A persisted widget configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WidgetInput", into = "WidgetOutput")]
pub struct Widget {
    pub id: String,
    pub title: String,
    pub provider: ProviderId,
    pub endpoint: String,
    pub params: BTreeMap<String, String>,
    pub mapping: WidgetMapping,
    pub refresh_ms: u64,
}

impl Widget {
    pub fn widget_type(&self) -> WidgetType {
        self.mapping.widget_type()
    }

    /// The request a refresh of this widget sends to the gateway.
    pub fn gateway_request(&self) -> GatewayRequest {
        GatewayRequest::new(self.provider, self.endpoint.clone())
            .with_params(self.params.clone())
            .with_intent(RequestIntent::Data)
    }

    /// Candles for a raw document fetched for this widget.
    pub fn candles(&self, doc: &Value) -> Vec<Candle> {
        normalize(self.provider, &self.endpoint, doc)
    }
}

/// Input model for creating a new widget.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "WidgetInput")]
pub struct NewWidget {
    pub title: Option<String>,
    /// Legacy label, used only when `title` is absent.
    pub name: Option<String>,
    pub provider: ProviderId,
    pub endpoint: String,
    pub params: BTreeMap<String, String>,
    pub mapping: WidgetMapping,
    pub refresh_ms: Option<u64>,
}

impl NewWidget {
    pub fn new(provider: ProviderId, endpoint: impl Into<String>, mapping: WidgetMapping) -> Self {
        Self {
            title: None,
            name: None,
            provider,
            endpoint: endpoint.into(),
            params: BTreeMap::new(),
            mapping,
            refresh_ms: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_refresh_ms(mut self, refresh_ms: u64) -> Self {
        self.refresh_ms = Some(refresh_ms);
        self
    }

    /// Build the widget under `id`, applying label and refresh defaults.
    pub fn into_widget(self, id: String) -> Widget {
        Widget {
            id,
            title: resolve_title(self.title.as_deref(), self.name.as_deref()),
            provider: self.provider,
            endpoint: self.endpoint,
            params: self.params,
            mapping: self.mapping,
            refresh_ms: self.refresh_ms.unwrap_or(DEFAULT_REFRESH_MS),
        }
    }
}

/// `title`, then `name`, then [`UNTITLED_WIDGET`]. Blank labels are skipped.
pub fn resolve_title(title: Option<&str>, name: Option<&str>) -> String {
    [title, name]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|label| !label.is_empty())
        .unwrap_or(UNTITLED_WIDGET)
        .to_string()
}

/// Wire shape accepted for widgets, tolerant of legacy fields.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WidgetInput {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type")]
    kind: WidgetType,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    name: Option<String>,
    provider: ProviderId,
    endpoint: String,
    #[serde(default, deserialize_with = "deserialize_params")]
    params: BTreeMap<String, String>,
    #[serde(default)]
    mapping: Value,
    #[serde(default)]
    refresh_ms: Option<u64>,
}

impl TryFrom<WidgetInput> for NewWidget {
    type Error = Error;

    fn try_from(input: WidgetInput) -> Result<Self, Self::Error> {
        let mapping = WidgetMapping::from_value(input.kind, input.mapping)
            .map_err(|e| Error::Validation(format!("Invalid {:?} mapping: {}", input.kind, e)))?;
        Ok(NewWidget {
            title: input.title,
            name: input.name,
            provider: input.provider,
            endpoint: input.endpoint,
            params: input.params,
            mapping,
            refresh_ms: input.refresh_ms,
        })
    }
}

impl TryFrom<WidgetInput> for Widget {
    type Error = Error;

    fn try_from(mut input: WidgetInput) -> Result<Self, Self::Error> {
        let id = input
            .id
            .take()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::Validation("Widget id is required".to_string()))?;
        Ok(NewWidget::try_from(input)?.into_widget(id))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WidgetOutput {
    id: String,
    #[serde(rename = "type")]
    kind: WidgetType,
    title: String,
    provider: ProviderId,
    endpoint: String,
    params: BTreeMap<String, String>,
    mapping: Value,
    refresh_ms: u64,
}

impl From<Widget> for WidgetOutput {
    fn from(widget: Widget) -> Self {
        WidgetOutput {
            kind: widget.widget_type(),
            mapping: widget.mapping.to_value(),
            id: widget.id,
            title: widget.title,
            provider: widget.provider,
            endpoint: widget.endpoint,
            params: widget.params,
            refresh_ms: widget.refresh_ms,
        }
    }
}

/// Params are strings on the wire; scalar values are stringified.
fn deserialize_params<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect())
}

/// Export/import file: `{ version, widgets }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardExport {
    pub version: u32,
    pub widgets: Vec<Widget>,
}

/// Everything the dashboard persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub widgets: Vec<Widget>,
    pub has_seen_tour: bool,
}

impl DashboardState {
    /// Rebuild a state from a stored record, dropping unreadable widgets.
    pub fn from_value(value: &Value) -> Self {
        DashboardState {
            widgets: value.get("widgets").map(widgets_from_value).unwrap_or_default(),
            has_seen_tour: value
                .get("hasSeenTour")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }
}

/// Decode a widget array leniently.
///
/// Anything but an array yields no widgets. Elements that fail to decode are
/// skipped; of several widgets sharing an id only the first is kept.
pub fn widgets_from_value(value: &Value) -> Vec<Widget> {
    let Some(items) = value.as_array() else {
        warn!("Ignoring widgets payload that is not an array");
        return Vec::new();
    };

    let mut seen = HashSet::new();
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match Widget::deserialize(item) {
            Ok(widget) => Some(widget),
            Err(e) => {
                warn!("Skipping widget at index {}: {}", index, e);
                None
            }
        })
        .filter(|widget| {
            let fresh = seen.insert(widget.id.clone());
            if !fresh {
                warn!("Skipping duplicate widget id {}", widget.id);
            }
            fresh
        })
        .collect()
}

/// Move the element at `from` to `to`, shifting the others.
///
/// Returns `false` and leaves `items` untouched when the indices are equal or
/// either is out of range.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}
