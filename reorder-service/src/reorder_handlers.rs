use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use common_http_errors::{ApiError, ApiResult};
use common_policy::{Product, ReorderDecision, ReorderReason};

use crate::app::{run_evaluation, AppState};
use crate::notifications::{post_reorder_webhook, ReorderNotification};

/// The record handed to the order-placement collaborator. The service does
/// not track order state; placing and receiving the order happens elsewhere.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseOrder {
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub supplier_id: Option<Uuid>,
    pub quantity: f64,
    pub reason: ReorderReason,
    pub created_at: DateTime<Utc>,
}

impl PurchaseOrder {
    fn for_decision(product: &Product, decision: &ReorderDecision) -> Self {
        Self {
            order_id: Uuid::new_v4(),
            product_id: product.id,
            product_name: product.name.clone(),
            supplier_id: product.supplier_id,
            quantity: decision.suggested_quantity,
            reason: decision.reason,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CycleOrder {
    pub order: PurchaseOrder,
    pub notified: bool,
}

#[derive(Debug, Serialize)]
pub struct ReorderCycleSummary {
    pub evaluated: usize,
    pub failures: usize,
    pub orders: Vec<CycleOrder>,
}

/// Currently eligible reorder decisions from the last evaluation pass.
pub async fn list_reorders(State(state): State<AppState>) -> Json<Vec<ReorderDecision>> {
    let store = state.store.lock().unwrap();
    let eligible = store
        .last_report
        .as_ref()
        .map(|report| {
            report
                .evaluated
                .iter()
                .map(|entry| entry.decision.clone())
                .filter(|decision| decision.eligible)
                .collect()
        })
        .unwrap_or_default();
    Json(eligible)
}

/// Trigger a reorder for a single product, the manual path behind the
/// dashboard's reorder button.
pub async fn trigger_reorder(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> ApiResult<Json<PurchaseOrder>> {
    let (product, decision) = {
        let store = state.store.lock().unwrap();
        let product = store
            .products
            .iter()
            .find(|p| p.id == product_id)
            .cloned()
            .ok_or(ApiError::NotFound { code: "product_not_found", trace_id: None })?;
        let decision = store
            .last_report
            .as_ref()
            .and_then(|report| report.evaluated.iter().find(|e| e.product_id == product_id))
            .map(|entry| entry.decision.clone())
            .ok_or(ApiError::bad_request("not_evaluated", None))?;
        (product, decision)
    };

    if !decision.eligible {
        return Err(ApiError::conflict("reorder_not_required", None));
    }

    let order = PurchaseOrder::for_decision(&product, &decision);
    if let Err(err) = notify_order(&state, &order).await {
        state.metrics.notification_failures_total.inc();
        warn!(error = %err, order_id = %order.order_id, "Failed to post reorder notification");
        return Err(ApiError::internal(err, None));
    }
    info!(
        order_id = %order.order_id,
        product_id = %order.product_id,
        quantity = order.quantity,
        "Reorder triggered"
    );
    Ok(Json(order))
}

/// The automated reordering cycle: evaluate the stored snapshot, then build
/// and announce a purchase order for every eligible product. Notification
/// failures are recorded per order without aborting the cycle.
pub async fn run_reorder_cycle(State(state): State<AppState>) -> ApiResult<Json<ReorderCycleSummary>> {
    let (report, products) = {
        let mut store = state.store.lock().unwrap();
        let report = run_evaluation(&state, &mut store)?;
        (report, store.products.clone())
    };

    let mut orders = Vec::new();
    for entry in &report.evaluated {
        if !entry.decision.eligible {
            continue;
        }
        let Some(product) = products.iter().find(|p| p.id == entry.product_id) else {
            continue;
        };
        let order = PurchaseOrder::for_decision(product, &entry.decision);
        let notified = match notify_order(&state, &order).await {
            Ok(sent) => sent,
            Err(err) => {
                state.metrics.notification_failures_total.inc();
                warn!(error = %err, product_id = %order.product_id, "Reorder notification failed");
                false
            }
        };
        info!(
            order_id = %order.order_id,
            product_id = %order.product_id,
            quantity = order.quantity,
            notified,
            "Reorder cycle generated order"
        );
        orders.push(CycleOrder { order, notified });
    }

    Ok(Json(ReorderCycleSummary {
        evaluated: report.evaluated.len(),
        failures: report.failures.len(),
        orders,
    }))
}

/// Post the webhook notification for an order, if a webhook is configured.
/// Returns whether a notification was actually sent.
async fn notify_order(state: &AppState, order: &PurchaseOrder) -> anyhow::Result<bool> {
    let Some(url) = state.webhook_url.as_deref() else {
        return Ok(false);
    };
    let event = ReorderNotification::for_order(order);
    post_reorder_webhook(&state.http_client, url, state.webhook_bearer.as_deref(), &event).await?;
    Ok(true)
}
