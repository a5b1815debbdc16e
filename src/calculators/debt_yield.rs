//! Debt yield ratio for commercial real estate loans.
//!
//! Net operating income is effective gross income (gross rent plus other income, less
//! vacancy) minus operating expenses. Debt yield is NOI as a percentage of the loan, and
//! the risk grade is driven by the buffer above the lender's required debt yield.
use super::MAX_AMOUNT;
use crate::compute::{number_or_zero, require, Calculator, ComputationError};
use crate::store::{
    CalculatorDescriptor, ComputationResult, FieldSpec, InputSet, Registry, RegistryError,
    RiskLevel,
};

pub const ID: &str = "debt-yield-ratio";
pub const CATEGORY: &str = "finance";

/// Typical lender minimum when none is supplied.
pub const DEFAULT_REQUIRED_DEBT_YIELD: f64 = 10.0;

const PROPERTY_TYPES: &[&str] = &[
    "office",
    "retail",
    "industrial",
    "multifamily",
    "hotel",
    "self-storage",
    "medical",
    "mixed-use",
    "land",
    "other",
];

pub struct DebtYieldCalculator {
    schema: Vec<FieldSpec>,
}

impl DebtYieldCalculator {
    pub fn new() -> Self {
        Self {
            schema: vec![
                FieldSpec::select("propertyType", PROPERTY_TYPES),
                FieldSpec::amount("grossRentalIncome").max(100_000_000.0),
                FieldSpec::amount("otherIncome").optional().max(50_000_000.0),
                FieldSpec::rate("vacancyRate"),
                FieldSpec::amount("operatingExpenses").max(50_000_000.0),
                // Divisors get a floor so the ratios stay finite.
                FieldSpec::amount("loanAmount").min(1.0).max(MAX_AMOUNT),
                FieldSpec::amount("propertyValue").optional().min(1.0).max(MAX_AMOUNT),
                FieldSpec::rate("requiredDebtYield").optional().min(0.1),
            ],
        }
    }
}

impl Default for DebtYieldCalculator {
    fn default() -> Self { Self::new() }
}

impl Calculator for DebtYieldCalculator {
    fn schema(&self) -> &[FieldSpec] { &self.schema }

    fn calculate(&self, inputs: &InputSet) -> Result<ComputationResult, ComputationError> {
        let gross = require(inputs, "grossRentalIncome")?;
        let other = number_or_zero(inputs, "otherIncome");
        let vacancy = require(inputs, "vacancyRate")?;
        let expenses = require(inputs, "operatingExpenses")?;
        let loan = require(inputs, "loanAmount")?;
        let required = inputs.number("requiredDebtYield").unwrap_or(DEFAULT_REQUIRED_DEBT_YIELD);
        if loan <= 0.0 || required <= 0.0 {
            return Err(ComputationError::Precondition {
                errors: vec![
                    "Loan amount and required debt yield must be greater than zero".into(),
                ],
            });
        }

        let total_income = gross + other;
        let effective_gross_income = total_income * (1.0 - vacancy / 100.0);
        let noi = effective_gross_income - expenses;
        let debt_yield = noi / loan * 100.0;
        let max_loan = noi / (required / 100.0);
        let buffer = debt_yield - required;

        let mut out = ComputationResult::new(debt_yield)
            .with_figure("effectiveGrossIncome", effective_gross_income)
            .with_figure("netOperatingIncome", noi)
            .with_figure("maxLoanAmount", max_loan)
            .with_figure("debtYieldBuffer", buffer);

        if let Some(value) = inputs.number("propertyValue").filter(|v| *v > 0.0) {
            out = out
                .with_figure("capRate", noi / value * 100.0)
                .with_figure("loanToValue", loan / value * 100.0);
        }

        let (risk, recommendation) = if buffer >= 2.0 {
            (RiskLevel::Low, "Debt yield comfortably exceeds the lender minimum.")
        } else if buffer >= 0.5 {
            (RiskLevel::Medium, "Debt yield meets the minimum with a thin cushion.")
        } else if buffer >= 0.0 {
            (RiskLevel::High, "Debt yield barely meets the minimum; expect tighter terms.")
        } else {
            (
                RiskLevel::High,
                "Debt yield is below the required minimum; the loan may not qualify.",
            )
        };

        Ok(out
            .with_analysis(format!(
                "Debt yield of {:.2}% against a required {:.2}% (NOI {:.2})",
                debt_yield, required, noi
            ))
            .with_assessment(recommendation, risk))
    }
}

pub fn descriptor() -> CalculatorDescriptor {
    CalculatorDescriptor::new(ID, "Debt Yield Ratio Calculator", CATEGORY)
        .with_subcategory("real-estate")
        .with_description(
            "Debt yield ratio for commercial real estate loans, with NOI and loan sizing.",
        )
}

pub fn register(registry: &Registry) -> Result<(), RegistryError> {
    registry.register(descriptor(), DebtYieldCalculator::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn base() -> InputSet {
        InputSet::new()
            .with("propertyType", "office")
            .with("grossRentalIncome", 1_000_000.0)
            .with("otherIncome", 50_000.0)
            .with("vacancyRate", 5.0)
            .with("operatingExpenses", 400_000.0)
            .with("loanAmount", 5_000_000.0)
            .with("propertyValue", 8_000_000.0)
    }

    fn figure(out: &ComputationResult, name: &str) -> f64 {
        out.breakdown.iter().find(|(k, _)| k == name).map(|(_, v)| *v).unwrap()
    }

    #[test]
    fn test_debt_yield() {
        let calc = DebtYieldCalculator::new();
        let inputs = base();
        assert!(calc.validate(&inputs).is_valid);

        let out = calc.calculate(&inputs).unwrap();
        // EGI = 1,050,000 * 0.95 = 997,500; NOI = 597,500; DY = 11.95%
        assert!((figure(&out, "netOperatingIncome") - 597_500.0).abs() < 1e-6);
        assert!((out.result - 11.95).abs() < 1e-9);
        assert!((figure(&out, "maxLoanAmount") - 5_975_000.0).abs() < 1e-6);
        assert!((figure(&out, "loanToValue") - 62.5).abs() < 1e-9);
        assert_eq!(out.assessment.unwrap().risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_below_minimum_is_high_risk() {
        let inputs = base().with("requiredDebtYield", 14.0);
        let out = DebtYieldCalculator::new().calculate(&inputs).unwrap();
        let a = out.assessment.unwrap();
        assert_eq!(a.risk_level, RiskLevel::High);
        assert!(a.recommendation.contains("may not qualify"));
    }

    #[test]
    fn test_validation_messages() {
        let inputs = base()
            .with("propertyType", "castle")
            .with("vacancyRate", 120.0)
            .with("loanAmount", 0.0);
        let outcome = DebtYieldCalculator::new().validate(&inputs);
        assert_eq!(
            outcome.errors,
            vec![
                format!("Property type must be one of: {}", PROPERTY_TYPES.join(", ")),
                "Vacancy rate must be between 0 and 100".to_string(),
                "Loan amount must be between 1 and 1000000000000".to_string(),
            ]
        );
    }

    #[test]
    fn test_upper_bound() {
        let inputs = base().with("grossRentalIncome", 200_000_000.0);
        let outcome = DebtYieldCalculator::new().validate(&inputs);
        assert_eq!(outcome.errors, vec!["Gross rental income must be at most 100000000"]);
    }

    #[rstest]
    #[case("loanAmount", 1e-300)]
    #[case("propertyValue", 1e-300)]
    #[case("requiredDebtYield", 1e-300)]
    #[case("loanAmount", f64::MAX)]
    fn test_extreme_divisors_fail_validation(#[case] field: &str, #[case] value: f64) {
        let inputs = base().with(field, value);
        let outcome = DebtYieldCalculator::new().validate(&inputs);
        assert_eq!(outcome.errors.len(), 1, "{:?}", outcome.errors);
    }

    #[test]
    fn test_widest_accepted_inputs_stay_finite() {
        let inputs = base()
            .with("loanAmount", 1.0)
            .with("propertyValue", 1.0)
            .with("requiredDebtYield", 0.1);
        let calc = DebtYieldCalculator::new();
        assert!(calc.validate(&inputs).is_valid);
        let out = calc.calculate(&inputs).unwrap();
        assert!(out.first_non_finite().is_none(), "{out:?}");
    }
}
