use crate::compute::{ComputationError, Engine, Evaluation};
use crate::config::{build_registry, CatalogConfig};
use crate::store::{InputSet, InputValue, Registry};
use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::path::Path;

fn inputs_from_dict(dict: &Bound<'_, PyDict>) -> PyResult<InputSet> {
    let mut set = InputSet::new();
    for (key, value) in dict.iter() {
        let name: String = key.extract()?;
        // bool first: Python bools are ints.
        let v = if let Ok(b) = value.extract::<bool>() {
            InputValue::Flag(b)
        } else if let Ok(n) = value.extract::<f64>() {
            InputValue::Number(n)
        } else if let Ok(s) = value.extract::<String>() {
            InputValue::Text(s)
        } else {
            return Err(PyValueError::new_err(format!("Unsupported value for input '{}'", name)));
        };
        set.insert(name, v);
    }
    Ok(set)
}

fn to_py_err(e: ComputationError) -> PyErr {
    match e {
        ComputationError::NotFound(nf) => PyKeyError::new_err(nf.to_string()),
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

#[pyclass(name = "_Catalog")]
pub struct PyCatalog {
    registry: Registry,
}

#[pymethods]
impl PyCatalog {
    #[new]
    #[pyo3(signature = (config_path=None))]
    pub fn new(config_path: Option<String>) -> PyResult<Self> {
        let config = match config_path {
            Some(p) => CatalogConfig::load(Path::new(&p)),
            None => Ok(CatalogConfig::default()),
        }
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
        let registry = build_registry(&config).map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
        Ok(Self { registry })
    }

    /// (id, title, category) tuples in registration order.
    #[pyo3(signature = (category=None))]
    pub fn list(&self, category: Option<&str>) -> Vec<(String, String, String)> {
        self.registry
            .list(category)
            .iter()
            .map(|d| (d.id.clone(), d.title.clone(), d.category.clone()))
            .collect()
    }

    pub fn descriptor_json(&self, id: &str) -> PyResult<String> {
        let d = self.registry.descriptor(id).map_err(|e| PyKeyError::new_err(e.to_string()))?;
        serde_json::to_string(&d).map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    pub fn validate(&self, id: &str, inputs: &Bound<'_, PyDict>) -> PyResult<(bool, Vec<String>)> {
        let unit = self.registry.get(id).map_err(|e| PyKeyError::new_err(e.to_string()))?;
        let outcome = unit.validate(&inputs_from_dict(inputs)?);
        Ok((outcome.is_valid, outcome.errors))
    }

    /// Returns the primary result. Invalid input raises `ValueError` with every message.
    pub fn calculate(&self, id: &str, inputs: &Bound<'_, PyDict>) -> PyResult<f64> {
        let set = inputs_from_dict(inputs)?;
        match Engine::new(&self.registry).evaluate(id, &set).map_err(to_py_err)? {
            Evaluation::Computed(r) => Ok(r.result),
            Evaluation::Invalid(outcome) => Err(PyValueError::new_err(outcome.errors.join("\n"))),
        }
    }

    /// The full evaluation (result or validation errors) as JSON.
    pub fn evaluate_json(&self, id: &str, inputs: &Bound<'_, PyDict>) -> PyResult<String> {
        let set = inputs_from_dict(inputs)?;
        let eval = Engine::new(&self.registry).evaluate(id, &set).map_err(to_py_err)?;
        serde_json::to_string(&eval).map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    pub fn __len__(&self) -> usize { self.registry.len() }
}
