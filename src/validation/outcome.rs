//! The structured result of validating an `InputSet`.
use serde::{Serialize, Deserialize};

/// `is_valid` is always `errors.is_empty()`; the constructors keep the two in step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationOutcome {
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    pub fn from_errors(errors: Vec<String>) -> Self {
        Self { is_valid: errors.is_empty(), errors }
    }

    /// True if any message mentions `needle` (typically a field label).
    pub fn mentions(&self, needle: &str) -> bool {
        self.errors.iter().any(|e| e.contains(needle))
    }
}

impl Default for ValidationOutcome {
    fn default() -> Self { Self::valid() }
}

impl From<Vec<String>> for ValidationOutcome {
    fn from(errors: Vec<String>) -> Self { Self::from_errors(errors) }
}
