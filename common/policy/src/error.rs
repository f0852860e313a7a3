use serde::Serialize;
use thiserror::Error;

/// Typed failures surfaced by the policy core. The core never logs; callers
/// decide how to present these.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyError {
    #[error("invalid input: {field} must be a non-negative finite number, got {value}")]
    InvalidInput { field: &'static str, value: f64 },
    #[error("alert registry is held by another evaluation; retry")]
    RegistryConflict,
}

/// Numeric field guard shared by the classifier and decision engine.
pub(crate) fn require_non_negative(field: &'static str, value: f64) -> Result<f64, PolicyError> {
    if !value.is_finite() || value < 0.0 {
        return Err(PolicyError::InvalidInput { field, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_and_non_finite() {
        assert!(require_non_negative("current_stock", -1.0).is_err());
        assert!(require_non_negative("current_stock", f64::NAN).is_err());
        assert!(require_non_negative("current_stock", f64::INFINITY).is_err());
        assert_eq!(require_non_negative("current_stock", 0.0), Ok(0.0));
    }

    #[test]
    fn invalid_input_serializes_with_kind_tag() {
        let err = PolicyError::InvalidInput { field: "min_stock", value: -3.0 };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "invalid_input");
        assert_eq!(json["field"], "min_stock");
    }
}
