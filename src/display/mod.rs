//! Plain-text rendering for catalogs and evaluations.
pub mod report;

pub use report::{format_catalog, format_evaluation};
