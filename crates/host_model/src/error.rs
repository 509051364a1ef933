//! Errors of the host model.

use thiserror::Error;

/// Errors of a [PowerModel](crate::power_model::PowerModel).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PowerModelError {
    /// Calibration parameter is physically implausible.
    #[error("invalid power model parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Utilization fraction outside of `[0, 1]`.
    #[error("utilization fraction {0} has to be between 0 and 1")]
    OutOfRange(f64),
}

/// Errors of [HostSuitability](crate::suitability::HostSuitability) construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SuitabilityError {
    #[error("unsuitability reason must not be empty")]
    InvalidReason,
}
