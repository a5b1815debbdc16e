//! The synchronous request-time pipeline: look up, validate, then calculate.
use super::{Calculator, ComputationError};
use crate::store::{ComputationResult, InputSet, Registry};
use crate::validation::ValidationOutcome;
use rayon::prelude::*;
use serde::{Serialize, Deserialize};
use tracing::trace;

/// What a caller gets back for a known calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "body", rename_all = "lowercase")]
pub enum Evaluation {
    Computed(ComputationResult),
    /// Validation failed; `calculate` was not called.
    Invalid(ValidationOutcome),
}

impl Evaluation {
    pub fn result(&self) -> Option<&ComputationResult> {
        match self {
            Evaluation::Computed(r) => Some(r),
            Evaluation::Invalid(_) => None,
        }
    }

    pub fn is_computed(&self) -> bool { matches!(self, Evaluation::Computed(_)) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: String,
    pub inputs: InputSet,
}

impl Request {
    pub fn new(id: impl Into<String>, inputs: InputSet) -> Self {
        Self { id: id.into(), inputs }
    }
}

pub struct Engine<'a> {
    registry: &'a Registry,
}

impl<'a> Engine<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Unknown ids surface as `ComputationError::NotFound`; invalid input is returned
    /// as `Evaluation::Invalid` and never reaches the formula.
    pub fn evaluate(&self, id: &str, inputs: &InputSet) -> Result<Evaluation, ComputationError> {
        let unit = self.registry.get(id)?;
        let outcome = unit.validate(inputs);
        if !outcome.is_valid {
            trace!(id, errors = outcome.errors.len(), "inputs rejected");
            return Ok(Evaluation::Invalid(outcome));
        }
        let result = finite_or_err(unit.calculate(inputs)?)?;
        trace!(id, result = result.result, "calculated");
        Ok(Evaluation::Computed(result))
    }

    /// Evaluates independent requests in parallel. Output order matches input order.
    pub fn evaluate_batch(
        &self,
        requests: &[Request],
    ) -> Vec<Result<Evaluation, ComputationError>> {
        requests
            .par_iter()
            .map(|req| self.evaluate(&req.id, &req.inputs))
            .collect()
    }
}

/// Validates and then calculates, failing with `Precondition` rather than running the
/// formula on invalid input. For callers holding a unit directly instead of going
/// through an `Engine`.
pub fn checked_calculate(
    unit: &dyn Calculator,
    inputs: &InputSet,
) -> Result<ComputationResult, ComputationError> {
    let outcome = unit.validate(inputs);
    if !outcome.is_valid {
        return Err(ComputationError::Precondition { errors: outcome.errors });
    }
    finite_or_err(unit.calculate(inputs)?)
}

fn finite_or_err(result: ComputationResult) -> Result<ComputationResult, ComputationError> {
    match result.first_non_finite() {
        Some(field) => Err(ComputationError::NonFinite { field: field.to_string() }),
        None => Ok(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CalculatorDescriptor, FieldSpec};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Divides `value` by `divisor` and counts how often the formula runs.
    struct Ratio {
        schema: Vec<FieldSpec>,
        calls: Arc<AtomicUsize>,
    }

    impl Ratio {
        fn new(calls: Arc<AtomicUsize>) -> Self {
            Self {
                schema: vec![FieldSpec::amount("value"), FieldSpec::number("divisor")],
                calls,
            }
        }
    }

    impl Calculator for Ratio {
        fn schema(&self) -> &[FieldSpec] { &self.schema }

        fn calculate(&self, inputs: &InputSet) -> Result<ComputationResult, ComputationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let value = crate::compute::require(inputs, "value")?;
            let divisor = crate::compute::require(inputs, "divisor")?;
            // Deliberately unguarded so a zero divisor yields infinity.
            Ok(ComputationResult::new(value / divisor))
        }
    }

    fn setup() -> (Registry, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let reg = Registry::new();
        let descriptor = CalculatorDescriptor::new("ratio", "Ratio", "general");
        reg.register(descriptor, Ratio::new(Arc::clone(&calls))).unwrap();
        reg.seal();
        (reg, calls)
    }

    #[test]
    fn test_not_found_is_distinct_from_invalid() {
        let (reg, _) = setup();
        let err = Engine::new(&reg).evaluate("nope", &InputSet::new()).unwrap_err();
        assert!(matches!(err, ComputationError::NotFound(ref e) if e.id == "nope"));
        assert_eq!(err.to_string(), "Calculator 'nope' not found");
    }

    #[test]
    fn test_invalid_input_never_calculates() {
        let (reg, calls) = setup();
        let inputs = InputSet::new().with("value", -1.0).with("divisor", 2.0);
        let eval = Engine::new(&reg).evaluate("ratio", &inputs).unwrap();
        let expected = ValidationOutcome::from_errors(vec!["Value must be non-negative".into()]);
        assert_eq!(eval, Evaluation::Invalid(expected));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_non_finite_result_is_rejected() {
        let (reg, _) = setup();
        let inputs = InputSet::new().with("value", 1.0).with("divisor", 0.0);
        let err = Engine::new(&reg).evaluate("ratio", &inputs).unwrap_err();
        assert_eq!(err, ComputationError::NonFinite { field: "result".into() });
    }

    #[test]
    fn test_checked_calculate_enforces_precondition() {
        let (reg, calls) = setup();
        let unit = reg.get("ratio").unwrap();
        let missing = InputSet::new().with("divisor", 1.0);
        let err = checked_calculate(unit.as_ref(), &missing).unwrap_err();
        assert_eq!(
            err,
            ComputationError::Precondition { errors: vec!["Value is required".into()] }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let inputs = InputSet::new().with("value", 9.0).with("divisor", 3.0);
        let ok = checked_calculate(unit.as_ref(), &inputs).unwrap();
        assert_eq!(ok.result, 3.0);
    }

    #[test]
    fn test_batch_preserves_order() {
        let (reg, _) = setup();
        let requests: Vec<Request> = (1..=20)
            .map(|i| {
                let inputs = InputSet::new().with("value", i as f64).with("divisor", 1.0);
                Request::new("ratio", inputs)
            })
            .chain(std::iter::once(Request::new("missing", InputSet::new())))
            .collect();

        let out = Engine::new(&reg).evaluate_batch(&requests);
        assert_eq!(out.len(), 21);
        for (i, r) in out.iter().take(20).enumerate() {
            let eval = r.as_ref().unwrap();
            assert_eq!(eval.result().unwrap().result, (i + 1) as f64);
        }
        assert!(out[20].is_err());
    }

    #[test]
    fn test_evaluation_wire_shape() {
        let eval = Evaluation::Invalid(ValidationOutcome::from_errors(vec!["x".into()]));
        let json = serde_json::to_value(&eval).unwrap();
        assert_eq!(json["status"], "invalid");
        assert_eq!(json["body"]["isValid"], false);
    }
}
