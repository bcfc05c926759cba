use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use finboard_core::widgets::{DashboardExport, Widget};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TourState {
    has_seen_tour: bool,
}

async fn export_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardExport> {
    Json(state.dashboard_service.export_config())
}

/// Replaces the whole collection. Entries that cannot be read are dropped.
async fn import_dashboard(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Vec<Widget>>> {
    let Json(payload) = payload?;
    state.dashboard_service.import_config(&payload)?;
    Ok(Json(state.dashboard_service.get_widgets()))
}

async fn get_tour(State(state): State<Arc<AppState>>) -> Json<TourState> {
    Json(TourState {
        has_seen_tour: state.dashboard_service.has_seen_tour(),
    })
}

async fn set_tour(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TourState>, JsonRejection>,
) -> ApiResult<Json<TourState>> {
    let Json(body) = payload?;
    state
        .dashboard_service
        .set_has_seen_tour(body.has_seen_tour)?;
    Ok(Json(body))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard/export", get(export_dashboard))
        .route("/dashboard/import", post(import_dashboard))
        .route("/dashboard/tour", get(get_tour).put(set_tour))
}
