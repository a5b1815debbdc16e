//! Fixed-rate mortgage payment.
use super::MAX_AMOUNT;
use crate::compute::{require, Calculator, ComputationError};
use crate::store::{
    CalculatorDescriptor, ComputationResult, FieldSpec, InputSet, Registry, RegistryError,
};

pub const ID: &str = "mortgage-payment";
pub const CATEGORY: &str = "finance";

pub struct MortgageCalculator {
    schema: Vec<FieldSpec>,
}

impl MortgageCalculator {
    pub fn new() -> Self {
        Self {
            schema: vec![
                FieldSpec::amount("principal").max(MAX_AMOUNT),
                FieldSpec::rate("interestRate"),
                FieldSpec::quantity("termYears")
                    .label("Loan term")
                    .unit("years")
                    .min(1.0)
                    .max(50.0),
            ],
        }
    }
}

impl Default for MortgageCalculator {
    fn default() -> Self { Self::new() }
}

/// Standard amortising payment, `P * r / (1 - (1 + r)^-n)`.
///
/// The discount factor goes through `ln_1p`/`exp_m1` so very small monthly rates do not
/// round `(1 + r)^n` to exactly one. Rates below machine epsilon divide the principal evenly.
pub fn monthly_payment(principal: f64, annual_rate_pct: f64, months: f64) -> f64 {
    let r = annual_rate_pct / 100.0 / 12.0;
    if r < f64::EPSILON {
        return principal / months;
    }
    let discount = -(-months * r.ln_1p()).exp_m1();
    principal * r / discount
}

impl Calculator for MortgageCalculator {
    fn schema(&self) -> &[FieldSpec] { &self.schema }

    fn calculate(&self, inputs: &InputSet) -> Result<ComputationResult, ComputationError> {
        let principal = require(inputs, "principal")?;
        let rate = require(inputs, "interestRate")?;
        let years = require(inputs, "termYears")?;
        if years < 1.0 {
            return Err(ComputationError::Precondition {
                errors: vec!["Loan term must be at least 1".into()],
            });
        }

        let months = (years * 12.0).round();
        let payment = monthly_payment(principal, rate, months);
        let total_paid = payment * months;

        Ok(ComputationResult::new(payment)
            .with_figure("totalPaid", total_paid)
            .with_figure("totalInterest", total_paid - principal)
            .with_analysis(format!("{} monthly payments of {:.2}", months, payment)))
    }
}

pub fn descriptor() -> CalculatorDescriptor {
    CalculatorDescriptor::new(ID, "Mortgage Payment Calculator", CATEGORY)
        .with_subcategory("mortgage")
        .with_description("Monthly payment and total interest for a fixed-rate loan.")
}

pub fn register(registry: &Registry) -> Result<(), RegistryError> {
    registry.register(descriptor(), MortgageCalculator::new())
}
