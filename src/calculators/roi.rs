//! Return on investment, with an annualised figure when a holding period is given.
use super::MAX_AMOUNT;
use crate::compute::{require, Calculator, ComputationError};
use crate::store::{
    CalculatorDescriptor, ComputationResult, FieldSpec, InputSet, Registry, RegistryError,
    RiskLevel,
};

pub const ID: &str = "roi-calc";
pub const CATEGORY: &str = "finance";

pub struct RoiCalculator {
    schema: Vec<FieldSpec>,
}

impl RoiCalculator {
    pub fn new() -> Self {
        Self {
            schema: vec![
                // A floor of one unit bounds the ratio `finalValue / initialInvestment`.
                FieldSpec::amount("initialInvestment").min(1.0).max(MAX_AMOUNT),
                FieldSpec::amount("finalValue").max(MAX_AMOUNT),
                FieldSpec::quantity("years").unit("years").optional().min(0.5).max(100.0),
            ],
        }
    }
}

impl Default for RoiCalculator {
    fn default() -> Self { Self::new() }
}

impl Calculator for RoiCalculator {
    fn schema(&self) -> &[FieldSpec] { &self.schema }

    fn calculate(&self, inputs: &InputSet) -> Result<ComputationResult, ComputationError> {
        let initial = require(inputs, "initialInvestment")?;
        let final_value = require(inputs, "finalValue")?;
        if initial <= 0.0 {
            return Err(ComputationError::Precondition {
                errors: vec!["Initial investment must be greater than zero".into()],
            });
        }

        let gain = final_value - initial;
        let roi = gain / initial * 100.0;
        let mut out = ComputationResult::new(roi).with_figure("gain", gain);

        if let Some(years) = inputs.number("years").filter(|y| *y >= 0.5) {
            let annualized = ((final_value / initial).powf(1.0 / years) - 1.0) * 100.0;
            out = out.with_figure("annualizedRoi", annualized);
        }

        let (risk, recommendation) = if roi < 0.0 {
            (
                RiskLevel::High,
                "The investment lost value; review the position before adding capital.",
            )
        } else if roi < 10.0 {
            (RiskLevel::Medium, "Returns are modest; compare against lower-risk alternatives.")
        } else {
            (RiskLevel::Low, "Returns are healthy relative to the capital invested.")
        };

        Ok(out
            .with_analysis(format!("ROI of {:.2}% on a gain of {:.2}", roi, gain))
            .with_assessment(recommendation, risk))
    }
}

pub fn descriptor() -> CalculatorDescriptor {
    CalculatorDescriptor::new(ID, "ROI Calculator", CATEGORY)
        .with_subcategory("investment")
        .with_description("Return on investment as a percentage of the initial outlay.")
}

pub fn register(registry: &Registry) -> Result<(), RegistryError> {
    registry.register(descriptor(), RoiCalculator::new())
}
