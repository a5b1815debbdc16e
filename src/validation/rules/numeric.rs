//! Range rules for numeric fields.
//!
//! Every rule takes the field's display label and value and returns the message to
//! report, or `None` when the value passes.

use crate::store::{FieldKind, FieldSpec};

/// NaN and the infinities never reach a formula.
pub fn finite(label: &str, value: f64) -> Option<String> {
    if value.is_finite() {
        None
    } else {
        Some(format!("{} must be a finite number", label))
    }
}

/// Applies to monetary amounts and quantities.
pub fn non_negative(label: &str, value: f64) -> Option<String> {
    if value < 0.0 {
        Some(format!("{} must be non-negative", label))
    } else {
        None
    }
}

/// Rates are percentages, so the accepted range is [0, 100] inclusive.
pub fn percentage(label: &str, value: f64) -> Option<String> {
    if (0.0..=100.0).contains(&value) {
        None
    } else {
        Some(format!("{} must be between 0 and 100", label))
    }
}

/// Strictly greater than zero. Used for divisors such as loan amounts and heights.
pub fn positive(label: &str, value: f64) -> Option<String> {
    if value > 0.0 {
        None
    } else {
        Some(format!("{} must be greater than zero", label))
    }
}

pub fn bounds(label: &str, value: f64, min: Option<f64>, max: Option<f64>) -> Option<String> {
    match (min, max) {
        (Some(lo), Some(hi)) if value < lo || value > hi => {
            Some(format!("{} must be between {} and {}", label, lo, hi))
        }
        (Some(lo), None) if value < lo => Some(format!("{} must be at least {}", label, lo)),
        (None, Some(hi)) if value > hi => Some(format!("{} must be at most {}", label, hi)),
        _ => None,
    }
}

/// Runs the rules implied by a field's kind followed by its declared bounds,
/// returning the first failure so each field contributes at most one message.
pub fn check_field(spec: &FieldSpec, label: &str, value: f64) -> Option<String> {
    finite(label, value)
        .or_else(|| match spec.kind {
            FieldKind::Amount | FieldKind::Quantity => non_negative(label, value),
            FieldKind::Rate => percentage(label, value),
            _ => None,
        })
        .or_else(|| bounds(label, value, spec.min, spec.max))
}
