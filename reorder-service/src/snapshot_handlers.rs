use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use common_http_errors::ApiResult;
use common_policy::{EvaluationReport, Product, ProductEvaluation, ShortageForecast};

use crate::app::{run_evaluation, AppState};

#[derive(Debug, Deserialize)]
pub struct SnapshotPayload {
    pub products: Vec<Product>,
    #[serde(default)]
    pub forecast: Vec<ShortageForecast>,
}

/// Replace the stored inventory snapshot and evaluate it immediately.
pub async fn submit_snapshot(
    State(state): State<AppState>,
    Json(payload): Json<SnapshotPayload>,
) -> ApiResult<Json<EvaluationReport>> {
    let mut store = state.store.lock().unwrap();
    store.products = payload.products;
    store.forecast = payload.forecast;
    let report = run_evaluation(&state, &mut store)?;
    info!(
        products = store.products.len(),
        alerts = report.alerts.len(),
        failures = report.failures.len(),
        "Inventory snapshot evaluated"
    );
    Ok(Json(report))
}

/// Re-run the pass on the stored snapshot. The caller owns the cadence; this
/// endpoint is what an external scheduler hits.
pub async fn evaluate_snapshot(State(state): State<AppState>) -> ApiResult<Json<EvaluationReport>> {
    let mut store = state.store.lock().unwrap();
    let report = run_evaluation(&state, &mut store)?;
    Ok(Json(report))
}

pub async fn get_inventory(State(state): State<AppState>) -> Json<Vec<ProductEvaluation>> {
    let store = state.store.lock().unwrap();
    let evaluated = store
        .last_report
        .as_ref()
        .map(|report| report.evaluated.clone())
        .unwrap_or_default();
    Json(evaluated)
}
