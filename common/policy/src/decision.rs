use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{require_non_negative, PolicyError};
use crate::product::{Product, ShortageForecast};
use crate::status::StockStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReorderReason {
    BelowReorderPoint,
    ForecastShortage,
    None,
}

/// Per-product eligibility verdict. Placing the actual purchase order is the
/// order-placement collaborator's job; this struct is the whole output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderDecision {
    pub product_id: Uuid,
    pub eligible: bool,
    pub suggested_quantity: f64,
    pub reason: ReorderReason,
}

/// Decide whether a product may be reordered and how much to suggest.
///
/// `shortage` is the product's in-window shortage projection, if the forecast
/// produced one this pass; it upgrades an otherwise ineligible product.
pub fn decide(
    product: &Product,
    status: StockStatus,
    shortage: Option<&ShortageForecast>,
) -> Result<ReorderDecision, PolicyError> {
    let reorder_point = require_non_negative("reorder_point", product.reorder_point)?;
    if let Some(demand) = product.predicted_demand {
        require_non_negative("predicted_demand", demand)?;
    }

    if status != StockStatus::Safe && product.current_stock <= reorder_point {
        let suggested = match product.predicted_demand {
            Some(demand) => (demand - product.current_stock).max(0.0),
            None => (reorder_point - product.current_stock).max(0.0),
        };
        return Ok(ReorderDecision {
            product_id: product.id,
            eligible: true,
            suggested_quantity: suggested,
            reason: ReorderReason::BelowReorderPoint,
        });
    }

    if let Some(forecast) = shortage {
        return Ok(ReorderDecision {
            product_id: product.id,
            eligible: true,
            suggested_quantity: forecast.projected_shortage_quantity,
            reason: ReorderReason::ForecastShortage,
        });
    }

    Ok(ReorderDecision {
        product_id: product.id,
        eligible: false,
        suggested_quantity: 0.0,
        reason: ReorderReason::None,
    })
}
