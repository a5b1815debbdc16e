use crate::compute::{require, Calculator, ComputationError};
use crate::store::{
    CalculatorDescriptor, ComputationResult, FieldSpec, InputSet, Registry, RegistryError,
    RiskLevel,
};

pub const ID: &str = "bmi";
pub const CATEGORY: &str = "health";

pub struct BmiCalculator {
    schema: Vec<FieldSpec>,
}

impl BmiCalculator {
    pub fn new() -> Self {
        Self {
            schema: vec![
                FieldSpec::quantity("weightKg").label("Weight").unit("kg").max(700.0),
                FieldSpec::quantity("heightCm").label("Height").unit("cm").min(30.0).max(300.0),
            ],
        }
    }
}

impl Default for BmiCalculator {
    fn default() -> Self { Self::new() }
}

impl Calculator for BmiCalculator {
    fn schema(&self) -> &[FieldSpec] { &self.schema }

    fn calculate(&self, inputs: &InputSet) -> Result<ComputationResult, ComputationError> {
        let weight = require(inputs, "weightKg")?;
        let height_m = require(inputs, "heightCm")? / 100.0;
        if height_m <= 0.0 {
            return Err(ComputationError::Precondition {
                errors: vec!["Height must be greater than zero".into()],
            });
        }
        let bmi = weight / (height_m * height_m);

        let (class, risk) = match bmi {
            b if b < 18.5 => ("underweight", RiskLevel::High),
            b if b < 25.0 => ("normal", RiskLevel::Low),
            b if b < 30.0 => ("overweight", RiskLevel::Medium),
            _ => ("obese", RiskLevel::High),
        };

        Ok(ComputationResult::new(bmi)
            .with_analysis(format!("BMI {:.1} ({})", bmi, class))
            .with_assessment(format!("Body mass index falls in the {} range.", class), risk))
    }
}

pub fn descriptor() -> CalculatorDescriptor {
    CalculatorDescriptor::new(ID, "BMI Calculator", CATEGORY)
        .with_subcategory("fitness")
        .with_description("Body mass index from weight and height.")
}

pub fn register(registry: &Registry) -> Result<(), RegistryError> {
    registry.register(descriptor(), BmiCalculator::new())
}
