use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::ProviderId;

/// Why a gateway request is made.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestIntent {
    /// Trial fetch while configuring a widget.
    Preview,
    /// Regular widget refresh.
    Data,
}

/// Request sent to the proxy gateway.
///
/// `params` is an ordered map so that identical requests serialize to
/// identical keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRequest {
    pub provider: ProviderId,
    pub endpoint: String,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<RequestIntent>,
}

impl GatewayRequest {
    pub fn new(provider: ProviderId, endpoint: impl Into<String>) -> Self {
        Self {
            provider,
            endpoint: endpoint.into(),
            params: BTreeMap::new(),
            intent: None,
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_params(mut self, params: BTreeMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn with_intent(mut self, intent: RequestIntent) -> Self {
        self.intent = Some(intent);
        self
    }

    /// Stable identity of the request, used to collapse identical fetches.
    ///
    /// This is the JSON encoding of the request. `params` is ordered and its
    /// values are escaped, so distinct requests never share a key.
    pub fn dedupe_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}
