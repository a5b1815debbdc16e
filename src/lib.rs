//! A directory of independent, self-describing calculators.
//!
//! Calculators implement `compute::Calculator` and are registered into a
//! `store::Registry` once at startup. Callers then look them up by id, validate
//! inputs and calculate, usually through `compute::Engine`.

pub mod calculators;
pub mod compute;
pub mod config;
pub mod display;
pub mod store;
pub mod validation;

#[cfg(feature = "python")]
mod bindings {
    pub mod python;
}

pub use compute::{Calculator, ComputationError, Engine, Evaluation};
pub use config::{build_registry, CatalogConfig};
pub use store::{
    CalculatorDescriptor, ComputationResult, InputSet, NotFoundError, Registry, RegistryError,
};
pub use validation::{ValidationOutcome, Validator};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Reports the crate version to Python callers.
#[cfg(feature = "python")]
#[pyfunction]
fn rust_core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Defines the `_core` Python module.
#[cfg(feature = "python")]
#[pymodule]
fn _core(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(rust_core_version, m)?)?;
    m.add_class::<bindings::python::PyCatalog>()?;
    Ok(())
}
