use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;

/// Identity and presentation metadata for one calculator.
///
/// The `id` doubles as the registry key and the URL slug, so it is treated as an
/// opaque, case-sensitive string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorDescriptor {
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub description: String,
}

impl CalculatorDescriptor {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            subcategory: String::new(),
            description: String::new(),
        }
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = subcategory.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A single named input. Untagged on the wire so plain JSON objects map directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Number(f64),
    Flag(bool),
    Text(String),
}

impl InputValue {
    /// Empty or whitespace-only text.
    pub fn is_blank(&self) -> bool {
        matches!(self, InputValue::Text(s) if s.trim().is_empty())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            InputValue::Number(_) => "number",
            InputValue::Flag(_) => "flag",
            InputValue::Text(_) => "text",
        }
    }
}

impl From<f64> for InputValue {
    fn from(v: f64) -> Self { InputValue::Number(v) }
}

impl From<i32> for InputValue {
    fn from(v: i32) -> Self { InputValue::Number(v as f64) }
}

impl From<bool> for InputValue {
    fn from(v: bool) -> Self { InputValue::Flag(v) }
}

impl From<&str> for InputValue {
    fn from(v: &str) -> Self { InputValue::Text(v.to_string()) }
}

impl From<String> for InputValue {
    fn from(v: String) -> Self { InputValue::Text(v) }
}

/// The open, calculator-specific set of named inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputSet {
    fields: BTreeMap<String, InputValue>,
}

impl InputSet {
    pub fn new() -> Self { Self::default() }

    /// Builder-style insert, mostly for call sites assembling inputs by hand.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<InputValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<InputValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&InputValue> { self.fields.get(name) }

    /// Returns the field as a number, or `None` if it is absent or not numeric.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.fields.get(name) {
            Some(InputValue::Number(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(InputValue::Text(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.fields.get(name) {
            Some(InputValue::Flag(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool { self.fields.contains_key(name) }
    pub fn len(&self) -> usize { self.fields.len() }
    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InputValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<InputValue>> FromIterator<(K, V)> for InputSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = InputSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

/// Semantic classification of an input field. Drives the uniform range rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// A monetary value. Must be non-negative.
    Amount,
    /// A count or physical quantity. Must be non-negative.
    Quantity,
    /// A percentage. Must lie in [0, 100].
    Rate,
    /// An unconstrained finite number.
    Number,
    /// A text value chosen from `options`.
    Select,
    Flag,
}

/// Declares one input a calculator accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FieldSpec {
    fn of(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: None,
            kind,
            unit: None,
            required: true,
            min: None,
            max: None,
            options: Vec::new(),
        }
    }

    pub fn amount(name: &str) -> Self { Self::of(name, FieldKind::Amount).unit("USD") }
    pub fn quantity(name: &str) -> Self { Self::of(name, FieldKind::Quantity) }
    pub fn rate(name: &str) -> Self { Self::of(name, FieldKind::Rate).unit("%") }
    pub fn number(name: &str) -> Self { Self::of(name, FieldKind::Number) }
    pub fn flag(name: &str) -> Self { Self::of(name, FieldKind::Flag) }

    pub fn select(name: &str, options: &[&str]) -> Self {
        let mut spec = Self::of(name, FieldKind::Select);
        spec.options = options.iter().map(|o| o.to_string()).collect();
        spec
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// The human-readable label used in validation messages.
    pub fn display_label(&self) -> String {
        self.label.clone().unwrap_or_else(|| humanize(&self.name))
    }
}

/// Turns `grossRentalIncome`, `gross_rental_income` or `gross-rental-income`
/// into `Gross rental income`.
pub fn humanize(name: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for ch in name.chars() {
        if ch == '_' || ch == '-' || ch == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if ch.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
            current.extend(ch.to_lowercase());
        } else {
            current.extend(ch.to_lowercase());
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    let joined = words.join(" ");
    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Structured interpretation attached to a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub recommendation: String,
    pub risk_level: RiskLevel,
}

/// Uniform output of a calculation.
///
/// `result` and every figure in `breakdown` are finite whenever a calculation succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputationResult {
    pub result: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment: Option<Analysis>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breakdown: Vec<(String, f64)>,
}

impl ComputationResult {
    pub fn new(result: f64) -> Self {
        Self { result, analysis: None, assessment: None, breakdown: Vec::new() }
    }

    pub fn with_analysis(mut self, analysis: impl Into<String>) -> Self {
        self.analysis = Some(analysis.into());
        self
    }

    pub fn with_assessment(
        mut self,
        recommendation: impl Into<String>,
        risk_level: RiskLevel,
    ) -> Self {
        self.assessment = Some(Analysis { recommendation: recommendation.into(), risk_level });
        self
    }

    pub fn with_figure(mut self, name: impl Into<String>, value: f64) -> Self {
        self.breakdown.push((name.into(), value));
        self
    }

    /// Name of the first non-finite figure, if any. The primary result reports as `result`.
    pub fn first_non_finite(&self) -> Option<&str> {
        if !self.result.is_finite() {
            return Some("result");
        }
        self.breakdown.iter().find(|(_, v)| !v.is_finite()).map(|(name, _)| name.as_str())
    }
}
