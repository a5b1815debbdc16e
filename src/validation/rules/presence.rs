//! Presence and type rules.
use crate::store::{FieldKind, FieldSpec, InputValue};

pub fn required(label: &str, value: Option<&InputValue>) -> Option<String> {
    match value {
        None => Some(format!("{} is required", label)),
        Some(InputValue::Text(s)) if s.trim().is_empty() => Some(format!("{} is required", label)),
        Some(_) => None,
    }
}

/// Checks the value has the shape its kind expects. A text where a number belongs
/// is reported like any other invalid input.
pub fn type_matches(spec: &FieldSpec, label: &str, value: &InputValue) -> Option<String> {
    let expected = match spec.kind {
        FieldKind::Amount | FieldKind::Quantity | FieldKind::Rate | FieldKind::Number => "number",
        FieldKind::Select => "text",
        FieldKind::Flag => "flag",
    };
    if value.type_name() == expected {
        None
    } else {
        let article = match expected {
            "number" => "a number",
            "flag" => "true or false",
            _ => "text",
        };
        Some(format!("{} must be {}", label, article))
    }
}

pub fn one_of(label: &str, value: &str, options: &[String]) -> Option<String> {
    if options.is_empty() || options.iter().any(|o| o == value) {
        None
    } else {
        Some(format!("{} must be one of: {}", label, options.join(", ")))
    }
}
