use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use finboard_core::widgets::{project_with_candles, NewWidget, Widget, WidgetView};
use finboard_market_data::{
    build_detail, leaf_paths, Candle, DataGateway, RequestIntent, WidgetDetail,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::proxy::{read_body, ProxyBody};
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

/// Nesting depth offered to the field picker.
const PREVIEW_PATH_DEPTH: usize = 6;

#[derive(Deserialize)]
struct ReorderBody {
    from: usize,
    to: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WidgetData {
    candles: Vec<Candle>,
    view: WidgetView,
    detail: WidgetDetail,
}

#[derive(Serialize)]
struct Preview {
    data: Value,
    paths: Vec<String>,
}

async fn list_widgets(State(state): State<Arc<AppState>>) -> Json<Vec<Widget>> {
    Json(state.dashboard_service.get_widgets())
}

async fn get_widget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Widget>> {
    state
        .dashboard_service
        .get_widget(&id)
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn add_widget(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewWidget>, JsonRejection>,
) -> ApiResult<Json<Widget>> {
    let Json(new_widget) = payload?;
    let widget = state.dashboard_service.add_widget(new_widget)?;
    Ok(Json(widget))
}

async fn remove_widget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.dashboard_service.remove_widget(&id)?;
    Ok(())
}

async fn reorder_widgets(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReorderBody>, JsonRejection>,
) -> ApiResult<Json<Vec<Widget>>> {
    let Json(body) = payload?;
    state.dashboard_service.reorder(body.from, body.to)?;
    Ok(Json(state.dashboard_service.get_widgets()))
}

async fn widget_data(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<WidgetData>> {
    let widget = state
        .dashboard_service
        .get_widget(&id)
        .ok_or(ApiError::NotFound)?;

    let doc = state.widget_gateway.fetch(&widget.gateway_request()).await?;
    let candles = widget.candles(&doc);
    let view = project_with_candles(&widget, &doc, &candles);
    let detail = build_detail(widget.provider, &widget.endpoint, &doc);

    Ok(Json(WidgetData {
        candles,
        view,
        detail,
    }))
}

async fn preview(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProxyBody>, JsonRejection>,
) -> ApiResult<Json<Preview>> {
    let request = read_body(payload)?
        .into_request()?
        .with_intent(RequestIntent::Preview);
    let data = state.widget_gateway.fetch(&request).await?;
    let paths = leaf_paths(&data, PREVIEW_PATH_DEPTH);
    Ok(Json(Preview { data, paths }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/widgets", get(list_widgets).post(add_widget))
        .route("/widgets/reorder", post(reorder_widgets))
        .route("/widgets/{id}", get(get_widget).delete(remove_widget))
        .route("/widgets/{id}/data", get(widget_data))
        .route("/preview", post(preview))
}
