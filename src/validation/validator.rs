//! The collector that calculators drive to build a `ValidationOutcome`.
use super::outcome::ValidationOutcome;
use super::rules::{numeric, presence};
use crate::store::{FieldKind, FieldSpec, InputSet};
use smallvec::SmallVec;

/// Accumulates error messages in the order rules are applied.
///
/// The usual sequence is `schema()` for the uniform field rules, then any number of
/// calculator-specific `check()` calls, then `finish()`. Cross-field checks read their
/// operands through `valid_number()`, which hides fields that already failed, so a bad
/// field is reported once rather than again by every rule that depends on it.
pub struct Validator<'a> {
    inputs: &'a InputSet,
    errors: SmallVec<[String; 4]>,
    failed: SmallVec<[&'a str; 4]>,
}

impl<'a> Validator<'a> {
    pub fn new(inputs: &'a InputSet) -> Self {
        Self {
            inputs,
            errors: SmallVec::new(),
            failed: SmallVec::new(),
        }
    }

    /// Applies the field rules for every spec, in declaration order.
    pub fn schema(&mut self, specs: &'a [FieldSpec]) -> &mut Self {
        for spec in specs {
            self.field(spec);
        }
        self
    }

    /// Presence, then type, then the kind's range rule and declared bounds.
    /// Stops at the first failure for the field.
    pub fn field(&mut self, spec: &'a FieldSpec) -> &mut Self {
        let label = spec.display_label();
        // Blank text in an optional field is treated as not supplied.
        let value = self
            .inputs
            .get(&spec.name)
            .filter(|v| spec.required || !v.is_blank());

        let Some(value) = value else {
            if spec.required {
                if let Some(msg) = presence::required(&label, None) {
                    self.fail(&spec.name, msg);
                }
            }
            return self;
        };

        let error = presence::required(&label, Some(value))
            .or_else(|| presence::type_matches(spec, &label, value))
            .or_else(|| match spec.kind {
                FieldKind::Select => self
                    .inputs
                    .text(&spec.name)
                    .and_then(|v| presence::one_of(&label, v, &spec.options)),
                FieldKind::Flag => None,
                _ => self
                    .inputs
                    .number(&spec.name)
                    .and_then(|v| numeric::check_field(spec, &label, v)),
            });

        if let Some(msg) = error {
            self.fail(&spec.name, msg);
        }
        self
    }

    /// A calculator-specific rule: records `message` when `ok` is false.
    pub fn check(&mut self, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.errors.push(message.into());
        }
        self
    }

    /// Records the message returned by a reusable rule against `field`.
    pub fn rule(&mut self, field: &'a str, result: Option<String>) -> &mut Self {
        if let Some(msg) = result {
            self.fail(field, msg);
        }
        self
    }

    /// The numeric value of `name`, unless it is missing or already failed a rule.
    pub fn valid_number(&self, name: &str) -> Option<f64> {
        if self.failed.iter().any(|f| *f == name) {
            return None;
        }
        self.inputs.number(name).filter(|v| v.is_finite())
    }

    pub fn has_failed(&self, name: &str) -> bool {
        self.failed.iter().any(|f| *f == name)
    }

    pub fn is_clean(&self) -> bool { self.errors.is_empty() }

    pub fn finish(self) -> ValidationOutcome {
        ValidationOutcome::from_errors(self.errors.into_vec())
    }

    fn fail(&mut self, field: &'a str, msg: String) {
        self.failed.push(field);
        self.errors.push(msg);
    }
}

/// Validates `inputs` against `specs` with no calculator-specific rules.
pub fn validate_schema(specs: &[FieldSpec], inputs: &InputSet) -> ValidationOutcome {
    let mut v = Validator::new(inputs);
    v.schema(specs);
    v.finish()
}
