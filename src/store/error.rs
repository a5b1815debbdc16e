use thiserror::Error;

/// Registration-time failures. These are fatal during startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Calculator '{0}' is already registered")]
    DuplicateId(String),
    #[error("Invalid calculator id '{0}': ids must be non-empty and contain no whitespace")]
    InvalidId(String),
    #[error("Registry is sealed; late registration of '{0}' is disabled")]
    Sealed(String),
}

/// Lookup of an id the registry does not hold. Recoverable at request time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Calculator '{id}' not found")]
pub struct NotFoundError {
    pub id: String,
}
