//! Built-in computation units.
//!
//! Each submodule owns one calculator and exposes `register()`, which the process
//! entry point (or `config::build_registry`) calls exactly once during the init phase.
use crate::store::{Registry, RegistryError};
use tracing::info;

pub mod basic_sum;
pub mod bmi;
pub mod debt_yield;
pub mod mortgage;
pub mod roi;

/// Ceiling on monetary and count inputs. Keeps every built-in formula finite.
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

type RegisterFn = fn(&Registry) -> Result<(), RegistryError>;

/// Registration order, which is also the default listing order.
const BUILTINS: &[(&str, RegisterFn)] = &[
    (basic_sum::CATEGORY, basic_sum::register),
    (roi::CATEGORY, roi::register),
    (debt_yield::CATEGORY, debt_yield::register),
    (mortgage::CATEGORY, mortgage::register),
    (bmi::CATEGORY, bmi::register),
];

/// Registers every built-in calculator.
pub fn register_all(registry: &Registry) -> Result<(), RegistryError> {
    register_categories(registry, None)
}

/// Registers the built-ins whose category is in `allow`, or all of them when `allow` is `None`.
pub fn register_categories(
    registry: &Registry,
    allow: Option<&[String]>,
) -> Result<(), RegistryError> {
    let mut count = 0;
    for (category, register) in BUILTINS {
        if allow.map_or(true, |cats| cats.iter().any(|c| c == category)) {
            register(registry)?;
            count += 1;
        }
    }
    info!(count, "registered built-in calculators");
    Ok(())
}
