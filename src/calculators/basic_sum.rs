//! The generic four-field calculator: sums `value`, `rate`, `amount` and `quantity`.
use super::MAX_AMOUNT;
use crate::compute::{number_or_zero, require, Calculator, ComputationError};
use crate::store::{
    CalculatorDescriptor, ComputationResult, FieldSpec, InputSet, Registry, RegistryError,
};

pub const ID: &str = "basic-sum";
pub const CATEGORY: &str = "general";

pub struct BasicSum {
    schema: Vec<FieldSpec>,
}

impl BasicSum {
    pub fn new() -> Self {
        Self {
            schema: vec![
                FieldSpec::quantity("value").max(MAX_AMOUNT),
                FieldSpec::rate("rate"),
                FieldSpec::amount("amount").optional().max(MAX_AMOUNT),
                FieldSpec::quantity("quantity").optional().max(MAX_AMOUNT),
            ],
        }
    }
}

impl Default for BasicSum {
    fn default() -> Self { Self::new() }
}

impl Calculator for BasicSum {
    fn schema(&self) -> &[FieldSpec] { &self.schema }

    fn calculate(&self, inputs: &InputSet) -> Result<ComputationResult, ComputationError> {
        let value = require(inputs, "value")?;
        let rate = require(inputs, "rate")?;
        let amount = number_or_zero(inputs, "amount");
        let quantity = number_or_zero(inputs, "quantity");

        let total = value + rate + amount + quantity;
        Ok(ComputationResult::new(total)
            .with_analysis(format!("Sum of numeric inputs: {:.2}", total)))
    }
}

pub fn descriptor() -> CalculatorDescriptor {
    CalculatorDescriptor::new(ID, "Basic Calculator", CATEGORY)
        .with_description("Adds the value, rate, amount and quantity inputs.")
}

pub fn register(registry: &Registry) -> Result<(), RegistryError> {
    registry.register(descriptor(), BasicSum::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_with_optional_fields_absent() {
        let calc = BasicSum::new();
        let inputs = InputSet::new().with("value", 100.0).with("rate", 10.0);
        assert!(calc.validate(&inputs).is_valid);
        let out = calc.calculate(&inputs).unwrap();
        assert_eq!(out.result, 110.0);
        assert_eq!(out.analysis.as_deref(), Some("Sum of numeric inputs: 110.00"));
    }

    #[test]
    fn test_sum_all_fields() {
        let inputs = InputSet::new()
            .with("value", 1.0)
            .with("rate", 2.0)
            .with("amount", 3.0)
            .with("quantity", 4.0);
        assert_eq!(BasicSum::new().calculate(&inputs).unwrap().result, 10.0);
    }

    #[test]
    fn test_oversized_inputs_fail_validation() {
        let inputs = InputSet::new()
            .with("value", f64::MAX)
            .with("rate", 0.0)
            .with("amount", f64::MAX);
        let outcome = BasicSum::new().validate(&inputs);
        assert_eq!(
            outcome.errors,
            vec![
                "Value must be at most 1000000000000",
                "Amount must be at most 1000000000000",
            ]
        );
    }
}
