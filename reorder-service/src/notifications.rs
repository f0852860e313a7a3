use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use common_policy::ReorderReason;

use crate::reorder_handlers::PurchaseOrder;

#[derive(Debug, Serialize)]
pub struct ReorderNotification {
    pub action: &'static str,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub supplier_id: Option<Uuid>,
    pub quantity: f64,
    pub reason: ReorderReason,
    pub occurred_at: DateTime<Utc>,
    pub message: String,
}

impl ReorderNotification {
    pub fn for_order(order: &PurchaseOrder) -> Self {
        Self {
            action: "inventory.reorder",
            order_id: order.order_id,
            product_id: order.product_id,
            product_name: order.product_name.clone(),
            supplier_id: order.supplier_id,
            quantity: order.quantity,
            reason: order.reason,
            occurred_at: order.created_at,
            message: format!(
                "Reorder initiated for {}. Quantity: {} units.",
                order.product_name, order.quantity
            ),
        }
    }
}

pub async fn post_reorder_webhook(
    client: &Client,
    url: &str,
    bearer: Option<&str>,
    event: &ReorderNotification,
) -> Result<()> {
    if url.trim().is_empty() {
        return Ok(());
    }

    let mut req = client.post(url).json(event);
    if let Some(token) = bearer {
        req = req.bearer_auth(token);
    }

    let response = req.send().await?;
    if !response.status().is_success() {
        warn!(status = ?response.status(), "Reorder webhook returned failure status");
        return Err(anyhow!(
            "Reorder webhook returned status {}",
            response.status()
        ));
    }

    info!(order_id = %event.order_id, product_id = %event.product_id, "Posted reorder notification webhook");
    Ok(())
}
