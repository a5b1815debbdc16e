//! Per-calculator input validation.
//!
//! Calculators compose the shared field rules (presence, type, range) derived from
//! their schema with their own cross-field checks through a `Validator`. Invalid
//! input is an expected outcome and is reported as data, never as an error.

pub use self::outcome::ValidationOutcome;
pub use self::validator::{validate_schema, Validator};

mod outcome;
mod validator;
pub mod rules {
    pub mod numeric;
    pub mod presence;
}
