//! Catalog data model and the in-memory registry of computation units.
pub mod error;
pub mod registry;
pub mod types;

pub use error::{NotFoundError, RegistryError};
pub use registry::{Listing, Registry};
pub use types::{
    Analysis, CalculatorDescriptor, ComputationResult, FieldKind, FieldSpec, InputSet, InputValue,
    RiskLevel,
};
