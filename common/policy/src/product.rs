use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One product row of an inventory snapshot. Snapshots are supplied by an
/// external data-source collaborator; the core never creates or deletes
/// products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub current_stock: f64,
    /// Safety floor; stock at or below this level is critical.
    pub min_stock: f64,
    pub reorder_point: f64,
    #[serde(default)]
    pub lead_time_days: u32,
    #[serde(default)]
    pub predicted_demand: Option<f64>,
    #[serde(default)]
    pub supplier_id: Option<Uuid>,
}

/// Forward-looking signal from the forecast collaborator: projected stockout
/// for a product, with the shortfall expected at that date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortageForecast {
    pub product_id: Uuid,
    pub projected_stockout_date: DateTime<Utc>,
    pub projected_shortage_quantity: f64,
}

impl ShortageForecast {
    /// A projection is actionable when the stockout lands inside the product's
    /// replenishment lead time. Dates already in the past count as in-window.
    pub fn within_lead_time(&self, lead_time_days: u32, now: DateTime<Utc>) -> bool {
        self.projected_stockout_date <= now + chrono::Duration::days(i64::from(lead_time_days))
    }
}
