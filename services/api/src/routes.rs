use crate::infra::{deserialize_optional_date, AppState, DashboardState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeSet;
use territory_dashboard::error::AppError;
use territory_dashboard::territories::{
    build_dashboard, next_selection, CategoryVisibility, DashboardRequest, DashboardSnapshot,
    Selection,
};
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct DashboardPayload {
    #[serde(default)]
    pub(crate) regions: BTreeSet<String>,
    #[serde(default)]
    pub(crate) search: String,
    #[serde(default)]
    pub(crate) min_population: Option<u64>,
    #[serde(default)]
    pub(crate) proximity_miles: Option<f64>,
    #[serde(default)]
    pub(crate) visibility: CategoryVisibility,
    #[serde(default)]
    pub(crate) selection: Option<Selection>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

impl DashboardPayload {
    fn into_request(self, state: &DashboardState) -> (DashboardRequest, Option<NaiveDate>) {
        let request = DashboardRequest {
            regions: self.regions,
            search: self.search,
            min_population: self.min_population.unwrap_or(state.min_population),
            proximity_miles: self.proximity_miles.unwrap_or(state.proximity_miles),
            visibility: self.visibility,
            selection: self.selection,
        };
        (request, self.today)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SelectionToggleRequest {
    #[serde(default)]
    pub(crate) current: Option<Selection>,
    pub(crate) clicked: Selection,
}

#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct SelectionToggleResponse {
    pub(crate) selection: Option<Selection>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegionsResponse {
    pub(crate) regions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReloadResponse {
    pub(crate) records: usize,
    pub(crate) regions: usize,
}

pub(crate) fn dashboard_router(state: DashboardState) -> Router {
    Router::new()
        .route("/api/v1/regions", get(regions_endpoint))
        .route("/api/v1/dashboard", post(dashboard_endpoint))
        .route("/api/v1/selection/toggle", post(selection_toggle_endpoint))
        .route("/api/v1/dataset/reload", post(dataset_reload_endpoint))
        .layer(Extension(state))
}

pub(crate) fn with_dashboard_routes(state: DashboardState) -> Router {
    dashboard_router(state)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn regions_endpoint(
    Extension(state): Extension<DashboardState>,
) -> Result<Json<RegionsResponse>, AppError> {
    let dataset = state.dataset().await?;
    Ok(Json(RegionsResponse {
        regions: dataset.regions(),
    }))
}

pub(crate) async fn dashboard_endpoint(
    Extension(state): Extension<DashboardState>,
    Json(payload): Json<DashboardPayload>,
) -> Result<Json<DashboardSnapshot>, AppError> {
    let (request, today) = payload.into_request(&state);
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let dataset = state.dataset().await?;
    let snapshot = build_dashboard(&dataset, &request, today)?;
    Ok(Json(snapshot))
}

pub(crate) async fn selection_toggle_endpoint(
    Json(payload): Json<SelectionToggleRequest>,
) -> Json<SelectionToggleResponse> {
    let SelectionToggleRequest { current, clicked } = payload;
    Json(SelectionToggleResponse {
        selection: next_selection(current.as_ref(), clicked),
    })
}

pub(crate) async fn dataset_reload_endpoint(
    Extension(state): Extension<DashboardState>,
) -> Result<Json<ReloadResponse>, AppError> {
    let dataset = state.reload().await?;
    info!(records = dataset.len(), "territory dataset reloaded on request");
    Ok(Json(ReloadResponse {
        records: dataset.len(),
        regions: dataset.regions().len(),
    }))
}
