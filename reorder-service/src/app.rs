use std::sync::{Arc, Mutex};
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    middleware,
    routing::{delete, get, post},
    Router,
};
use chrono::Utc;
use prometheus::{Encoder, TextEncoder};
use tower_http::cors::{AllowOrigin, CorsLayer};

use common_http_errors::ApiError;
use common_observability::ReorderMetrics;
use common_policy::{
    evaluate, AlertRegistry, EvaluationReport, PolicyConfig, PolicyError, Product, ShortageForecast,
};

use crate::alert_handlers::{dismiss_alert, list_alerts};
use crate::config::ServiceConfig;
use crate::reorder_handlers::{list_reorders, run_reorder_cycle, trigger_reorder};
use crate::snapshot_handlers::{evaluate_snapshot, get_inventory, submit_snapshot};

/// Latest inventory snapshot plus the report from the last evaluation pass.
/// The data-source collaborator replaces it wholesale via POST /inventory.
#[derive(Default)]
pub struct SnapshotStore {
    pub products: Vec<Product>,
    pub forecast: Vec<ShortageForecast>,
    pub last_report: Option<EvaluationReport>,
}

#[derive(Clone)]
pub struct AppState {
    pub policy: PolicyConfig,
    pub registry: Arc<AlertRegistry>,
    pub store: Arc<Mutex<SnapshotStore>>,
    pub metrics: Arc<ReorderMetrics>,
    pub http_client: reqwest::Client,
    pub webhook_url: Option<String>,
    pub webhook_bearer: Option<String>,
}

impl AppState {
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            policy: PolicyConfig { warning_band_multiplier: config.warning_band_multiplier },
            registry: Arc::new(AlertRegistry::new()),
            store: Arc::new(Mutex::new(SnapshotStore::default())),
            metrics: Arc::new(ReorderMetrics::new()),
            http_client: reqwest::Client::new(),
            webhook_url: config.reorder_webhook_url.clone(),
            webhook_bearer: config.reorder_webhook_bearer.clone(),
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

/// Run one evaluation pass over the stored snapshot, record metrics and cache
/// the report for the read endpoints.
pub(crate) fn run_evaluation(
    state: &AppState,
    store: &mut SnapshotStore,
) -> Result<EvaluationReport, ApiError> {
    let started = Instant::now();
    let report = evaluate(&store.products, &store.forecast, &state.registry, &state.policy, Utc::now())
        .map_err(map_policy_error)?;
    state.metrics.evaluations_total.inc();
    state
        .metrics
        .evaluation_duration_seconds
        .observe(started.elapsed().as_secs_f64());
    state.metrics.alerts_active.set(report.alerts.len() as i64);
    state.metrics.alerts_emitted_total.inc_by(report.alerts_emitted as u64);
    state.metrics.alerts_retired_total.inc_by(report.alerts_retired as u64);
    store.last_report = Some(report.clone());
    Ok(report)
}

pub(crate) fn map_policy_error(err: PolicyError) -> ApiError {
    match err {
        PolicyError::RegistryConflict => ApiError::Conflict {
            code: "registry_conflict",
            trace_id: None,
            message: Some("another evaluation holds the alert registry; retry".into()),
        },
        PolicyError::InvalidInput { .. } => ApiError::BadRequest {
            code: "invalid_input",
            trace_id: None,
            message: Some(err.to_string()),
        },
    }
}

async fn metrics_endpoint(State(state): State<AppState>) -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let families = state.metrics.registry.gather();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&families, &mut buf) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
    }
    (StatusCode::OK, String::from_utf8_lossy(&buf).to_string())
}

pub fn build_router(state: AppState) -> Router {
    let allowed_origins = [
        "http://localhost:3000",
        "http://localhost:3001",
        "http://localhost:5173",
    ];
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        ))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE]);

    async fn error_metrics_mw(
        State(metrics): State<Arc<ReorderMetrics>>,
        req: axum::http::Request<Body>,
        next: middleware::Next,
    ) -> axum::response::Response {
        let resp = next.run(req).await;
        let status = resp.status();
        if status.as_u16() >= 400 {
            let code = resp
                .headers()
                .get("x-error-code")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            metrics
                .http_errors_total
                .with_label_values(&["reorder-service", code, status.as_str()])
                .inc();
        }
        resp
    }

    let metrics = state.metrics.clone();
    Router::new()
        .route("/healthz", get(health))
        .route("/inventory", post(submit_snapshot).get(get_inventory))
        .route("/inventory/evaluate", post(evaluate_snapshot))
        .route("/alerts", get(list_alerts))
        .route("/alerts/:alert_id", delete(dismiss_alert))
        .route("/reorders", get(list_reorders))
        .route("/reorders/run", post(run_reorder_cycle))
        .route("/reorders/:product_id", post(trigger_reorder))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .layer(middleware::from_fn_with_state(metrics, error_metrics_mw))
        .layer(cors)
}
