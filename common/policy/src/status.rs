use serde::{Deserialize, Serialize};

use crate::error::{require_non_negative, PolicyError};
use crate::product::Product;

/// Stock tier derived from a product's current numbers. Recomputed on every
/// evaluation, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Critical,
    Warning,
    Safe,
}

/// Tunable policy constants. The warning band spans `min_stock` up to
/// `min_stock * warning_band_multiplier`, inclusive.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    pub warning_band_multiplier: f64,
}

impl PolicyConfig {
    pub const DEFAULT_WARNING_BAND_MULTIPLIER: f64 = 1.5;
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self { warning_band_multiplier: Self::DEFAULT_WARNING_BAND_MULTIPLIER }
    }
}

/// Classify a product's stock level.
///
/// Deterministic and side-effect free. When `min_stock` is zero the warning
/// band collapses: only an empty shelf is critical, any positive stock is
/// safe.
pub fn classify(product: &Product, config: &PolicyConfig) -> Result<StockStatus, PolicyError> {
    let stock = require_non_negative("current_stock", product.current_stock)?;
    let min = require_non_negative("min_stock", product.min_stock)?;

    if stock <= min {
        Ok(StockStatus::Critical)
    } else if stock <= min * config.warning_band_multiplier {
        Ok(StockStatus::Warning)
    } else {
        Ok(StockStatus::Safe)
    }
}
