//! The computation unit contract and the request-time evaluation pipeline.
pub mod engine;

pub use engine::{checked_calculate, Engine, Evaluation, Request};
pub use self::error::ComputationError;

use crate::store::{ComputationResult, FieldSpec, InputSet};
use crate::validation::{validate_schema, ValidationOutcome};

mod error {
    use crate::store::NotFoundError;
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum ComputationError {
        #[error(transparent)]
        NotFound(#[from] NotFoundError),
        #[error("calculate called on invalid input: {}", errors.join("; "))]
        Precondition { errors: Vec<String> },
        #[error("Required input '{field}' is missing or not a number")]
        MissingInput { field: String },
        #[error("Calculation produced a non-finite value for '{field}'")]
        NonFinite { field: String },
    }
}

/// A stateless calculator: a schema, a validator and a formula.
///
/// Implementations are values, not subclasses; the category they belong to is plain
/// data on the `CalculatorDescriptor` they are registered with. Both methods must be
/// pure: `calculate` returns bit-identical output for identical input.
pub trait Calculator: Send + Sync {
    /// Declared inputs, in the order validation reports them.
    fn schema(&self) -> &[FieldSpec] { &[] }

    /// Checks `inputs`. The default applies only the schema's field rules;
    /// calculators with cross-field constraints override this and call `Validator` themselves.
    fn validate(&self, inputs: &InputSet) -> ValidationOutcome {
        validate_schema(self.schema(), inputs)
    }

    /// Precondition: `validate(inputs).is_valid`. Calling it otherwise may fail with
    /// `ComputationError::Precondition` or `MissingInput`.
    fn calculate(&self, inputs: &InputSet) -> Result<ComputationResult, ComputationError>;
}

/// Reads a numeric input the formula cannot do without.
pub fn require(inputs: &InputSet, field: &str) -> Result<f64, ComputationError> {
    inputs
        .number(field)
        .ok_or_else(|| ComputationError::MissingInput { field: field.to_string() })
}

/// Reads an optional numeric input, treating absence as zero.
pub fn number_or_zero(inputs: &InputSet, field: &str) -> f64 {
    inputs.number(field).unwrap_or(0.0)
}
