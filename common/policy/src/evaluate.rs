use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::alert::{Alert, AlertCondition, AlertKind, AlertRegistry, AlertSeverity};
use crate::decision::{decide, ReorderDecision};
use crate::error::{require_non_negative, PolicyError};
use crate::product::{Product, ShortageForecast};
use crate::status::{classify, PolicyConfig, StockStatus};

#[derive(Debug, Clone, Serialize)]
pub struct ProductEvaluation {
    pub product_id: Uuid,
    pub status: StockStatus,
    pub decision: ReorderDecision,
}

/// A product whose evaluation aborted this pass. The rest of the batch is
/// unaffected and the product's previously active alerts stay in place.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationFailure {
    pub product_id: Uuid,
    pub error: PolicyError,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub evaluated: Vec<ProductEvaluation>,
    pub alerts: Vec<Alert>,
    pub failures: Vec<EvaluationFailure>,
    pub alerts_emitted: usize,
    pub alerts_retired: usize,
}

/// Run one evaluation pass over an inventory snapshot.
///
/// Classification and decisions are pure per-product computations; the only
/// mutation is the single atomic registry reconciliation at the end. The
/// caller supplies `now` and owns the cadence; the core has no timer.
/// A top-level `Err` is only [`PolicyError::RegistryConflict`], in which case
/// the registry was left unchanged and the caller may retry.
pub fn evaluate(
    products: &[Product],
    forecast: &[ShortageForecast],
    registry: &AlertRegistry,
    config: &PolicyConfig,
    now: DateTime<Utc>,
) -> Result<EvaluationReport, PolicyError> {
    let mut failures = Vec::new();
    let mut indeterminate: HashSet<Uuid> = HashSet::new();

    // Index the forecast by product; a malformed record aborts evaluation of
    // that product, the way a malformed product row does.
    let mut signals: HashMap<Uuid, &ShortageForecast> = HashMap::new();
    for signal in forecast {
        if let Err(error) =
            require_non_negative("projected_shortage_quantity", signal.projected_shortage_quantity)
        {
            failures.push(EvaluationFailure { product_id: signal.product_id, error });
            indeterminate.insert(signal.product_id);
            continue;
        }
        signals.insert(signal.product_id, signal);
    }

    let mut evaluated = Vec::with_capacity(products.len());
    let mut conditions = Vec::new();

    for product in products {
        if indeterminate.contains(&product.id) {
            continue;
        }

        let outcome = classify(product, config).and_then(|status| {
            let shortage = signals
                .get(&product.id)
                .copied()
                .filter(|signal| signal.within_lead_time(product.lead_time_days, now));
            decide(product, status, shortage).map(|decision| (status, shortage, decision))
        });

        let (status, shortage, decision) = match outcome {
            Ok(result) => result,
            Err(error) => {
                failures.push(EvaluationFailure { product_id: product.id, error });
                indeterminate.insert(product.id);
                continue;
            }
        };

        if status == StockStatus::Critical {
            conditions.push(AlertCondition {
                product_id: product.id,
                kind: AlertKind::LowStock,
                severity: AlertSeverity::from(status),
                message: format!(
                    "Low stock alert for {}. Current stock: {}",
                    product.name, product.current_stock
                ),
                projected_shortage_quantity: None,
                projected_stockout_date: None,
            });
        }

        if let Some(signal) = shortage {
            conditions.push(AlertCondition {
                product_id: product.id,
                kind: AlertKind::ShortageProjection,
                severity: AlertSeverity::ShortageProjection,
                message: format!(
                    "Projected stockout for {} by {}: short {} units",
                    product.name,
                    signal.projected_stockout_date.format("%Y-%m-%d"),
                    signal.projected_shortage_quantity
                ),
                projected_shortage_quantity: Some(signal.projected_shortage_quantity),
                projected_stockout_date: Some(signal.projected_stockout_date),
            });
        }

        evaluated.push(ProductEvaluation { product_id: product.id, status, decision });
    }

    let outcome = registry.sync(&conditions, &indeterminate, now)?;

    Ok(EvaluationReport {
        evaluated,
        alerts: outcome.active,
        failures,
        alerts_emitted: outcome.emitted,
        alerts_retired: outcome.retired,
    })
}
