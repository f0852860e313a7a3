use std::collections::HashSet;
use std::sync::{Mutex, TryLockError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PolicyError;
use crate::status::StockStatus;

/// Condition class an alert was raised for. At most one active alert exists
/// per `(product_id, kind)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    LowStock,
    ShortageProjection,
}

/// Mirrors [`StockStatus`], with an extra tier for forward-looking shortage
/// projections that are independent of the current stock level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Safe,
    Warning,
    Critical,
    ShortageProjection,
}

impl From<StockStatus> for AlertSeverity {
    fn from(status: StockStatus) -> Self {
        match status {
            StockStatus::Safe => AlertSeverity::Safe,
            StockStatus::Warning => AlertSeverity::Warning,
            StockStatus::Critical => AlertSeverity::Critical,
        }
    }
}

/// An active alert. Alerts are never mutated in place: they are created by an
/// evaluation pass and leave the active set either by dismissal or because
/// the underlying condition cleared.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub id: u64,
    pub product_id: Uuid,
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_shortage_quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_stockout_date: Option<DateTime<Utc>>,
}

/// A condition detected during an evaluation pass, before reconciliation with
/// the previously active alerts.
#[derive(Debug, Clone)]
pub(crate) struct AlertCondition {
    pub product_id: Uuid,
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub message: String,
    pub projected_shortage_quantity: Option<f64>,
    pub projected_stockout_date: Option<DateTime<Utc>>,
}

/// Result of reconciling one pass worth of conditions against the registry.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub active: Vec<Alert>,
    pub emitted: usize,
    pub retired: usize,
}

#[derive(Debug, Default)]
struct RegistryState {
    next_id: u64,
    active: Vec<Alert>,
    // Dismissed (product, kind) pairs; cleared once the condition goes away
    // so a fresh detection re-emits under a new id.
    suppressed: HashSet<(Uuid, AlertKind)>,
}

/// The one piece of mutable state the core owns: the active-alert set plus
/// the monotonic id counter. Callers hold it behind an `Arc` and pass it to
/// evaluation calls; mutation is serialized through a single lock so a pass
/// either applies fully or not at all.
#[derive(Debug, Default)]
pub struct AlertRegistry {
    state: Mutex<RegistryState>,
}

impl AlertRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the active alert set, in ascending id order.
    pub fn active(&self) -> Result<Vec<Alert>, PolicyError> {
        Ok(self.try_state()?.active.clone())
    }

    /// Remove an alert by id. Returns `false` when no active alert carries
    /// the id. The dismissed condition stays suppressed until it clears on a
    /// later pass; re-detection after that assigns a fresh id.
    pub fn dismiss(&self, alert_id: u64) -> Result<bool, PolicyError> {
        let mut state = self.try_state()?;
        let Some(pos) = state.active.iter().position(|a| a.id == alert_id) else {
            return Ok(false);
        };
        let alert = state.active.remove(pos);
        state.suppressed.insert((alert.product_id, alert.kind));
        Ok(true)
    }

    /// Clear active and suppressed state. The id counter keeps counting so
    /// ids stay strictly increasing for the process lifetime.
    pub fn reset(&self) -> Result<(), PolicyError> {
        let mut state = self.try_state()?;
        state.active.clear();
        state.suppressed.clear();
        Ok(())
    }

    /// Reconcile the conditions detected by one evaluation pass:
    /// keep equivalent active alerts, retire alerts whose condition is gone,
    /// emit new ids for fresh conditions that are not suppressed. Alerts for
    /// `indeterminate` products (ones whose evaluation failed this pass) are
    /// left untouched.
    pub(crate) fn sync(
        &self,
        conditions: &[AlertCondition],
        indeterminate: &HashSet<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<SyncOutcome, PolicyError> {
        let desired: HashSet<(Uuid, AlertKind)> =
            conditions.iter().map(|c| (c.product_id, c.kind)).collect();

        let mut state = self.try_state()?;

        let mut retired = 0usize;
        state.active.retain(|alert| {
            let keep = desired.contains(&(alert.product_id, alert.kind))
                || indeterminate.contains(&alert.product_id);
            if !keep {
                retired += 1;
            }
            keep
        });
        state
            .suppressed
            .retain(|key| desired.contains(key) || indeterminate.contains(&key.0));

        let mut emitted = 0usize;
        for condition in conditions {
            let key = (condition.product_id, condition.kind);
            if state.suppressed.contains(&key) {
                continue;
            }
            if state.active.iter().any(|a| (a.product_id, a.kind) == key) {
                continue;
            }
            state.next_id += 1;
            let next_id = state.next_id;
            state.active.push(Alert {
                id: next_id,
                product_id: condition.product_id,
                kind: condition.kind,
                severity: condition.severity,
                message: condition.message.clone(),
                created_at: now,
                projected_shortage_quantity: condition.projected_shortage_quantity,
                projected_stockout_date: condition.projected_stockout_date,
            });
            emitted += 1;
        }

        Ok(SyncOutcome { active: state.active.clone(), emitted, retired })
    }

    fn try_state(&self) -> Result<std::sync::MutexGuard<'_, RegistryState>, PolicyError> {
        match self.state.try_lock() {
            Ok(guard) => Ok(guard),
            // A poisoned lock only means a past panic mid-pass; the state
            // itself is still a consistent snapshot, so recover it.
            Err(TryLockError::Poisoned(poisoned)) => Ok(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => Err(PolicyError::RegistryConflict),
        }
    }
}
