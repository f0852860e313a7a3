use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use common_http_errors::{ApiError, ApiResult};
use common_policy::Alert;

use crate::app::{map_policy_error, AppState};

pub async fn list_alerts(State(state): State<AppState>) -> ApiResult<Json<Vec<Alert>>> {
    let alerts = state.registry.active().map_err(map_policy_error)?;
    Ok(Json(alerts))
}

/// Dismiss an alert by id. The condition stays suppressed until it clears;
/// a later fresh detection re-raises under a new id.
pub async fn dismiss_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<u64>,
) -> ApiResult<StatusCode> {
    let dismissed = state.registry.dismiss(alert_id).map_err(map_policy_error)?;
    if !dismissed {
        return Err(ApiError::NotFound { code: "alert_not_found", trace_id: None });
    }
    info!(alert_id, "Alert dismissed");
    Ok(StatusCode::NO_CONTENT)
}
