use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use finboard_market_data::{GatewayRequest, ProviderId, RequestIntent};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

/// Gateway request as it arrives over HTTP.
///
/// The provider is kept as a plain string so that an unknown name maps to
/// "Unsupported provider" instead of a body rejection.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProxyBody {
    provider: String,
    endpoint: String,
    #[serde(default)]
    params: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    intent: Option<RequestIntent>,
}

impl ProxyBody {
    pub(crate) fn into_request(self) -> ApiResult<GatewayRequest> {
        let provider: ProviderId = self.provider.parse()?;
        let params = self
            .params
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::Null => None,
                Value::String(s) => Some((key, s)),
                other => Some((key, other.to_string())),
            })
            .collect();

        let mut request = GatewayRequest::new(provider, self.endpoint).with_params(params);
        request.intent = self.intent;
        Ok(request)
    }
}

/// Unreadable bodies are reported like any other gateway failure.
pub(crate) fn read_body(payload: Result<Json<ProxyBody>, JsonRejection>) -> ApiResult<ProxyBody> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::Internal(rejection.body_text()))
}

async fn proxy(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProxyBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let request = read_body(payload)?.into_request()?;
    let doc = state.gateway.fetch(&request).await?;
    Ok(Json(doc))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/proxy", post(proxy))
}
