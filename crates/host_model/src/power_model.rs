//! Power consumption models of a host.

use crate::{error::PowerModelError, power_measurement::PowerMeasurement};

/// Lifecycle state of a host as seen by a power model.
pub trait HostActivity {
    /// Whether the host has been started at least once.
    fn has_ever_started(&self) -> bool;

    /// Whether the host is currently powered on.
    fn is_active(&self) -> bool;
}

/// Trait for a host power model.
pub trait PowerModel {
    /// Power draw of a host given its activity and CPU utilization fraction.
    ///
    /// `cpu_utilization` is expected to be in `[0, 1]` and is not clamped.
    fn measure(&self, is_active: bool, cpu_utilization: f64) -> PowerMeasurement;

    /// Total power (in watts) of `host` at a given utilization, including one-shot
    /// startup and shutdown costs.
    fn power(&self, host: &dyn HostActivity, utilization: f64) -> Result<f64, PowerModelError>;

    /// Power (in watts) spent once when a host starts.
    fn startup_power(&self) -> f64 {
        0.
    }

    /// Power (in watts) spent once when a host shuts down.
    fn shutdown_power(&self) -> f64 {
        0.
    }
}

fn validate_power(value: f64, name: &'static str) -> Result<f64, PowerModelError> {
    if !value.is_finite() {
        return Err(PowerModelError::InvalidParameter {
            name,
            value,
            reason: "has to be a finite number",
        });
    }
    if value < 0. {
        return Err(PowerModelError::InvalidParameter {
            name,
            value,
            reason: "can't be negative",
        });
    }
    Ok(value)
}

/// Power model with a linear profile between idle and full load.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearPowerModel {
    max_power: f64,
    static_power: f64,
    startup_power: f64,
    shutdown_power: f64,
}

impl LinearPowerModel {
    /// Creates a model from the power (in watts) under full load and when idle.
    pub fn new(max_power: f64, static_power: f64) -> Result<Self, PowerModelError> {
        let max_power = validate_power(max_power, "max_power")?;
        let static_power = validate_power(static_power, "static_power")?;
        if max_power < static_power {
            return Err(PowerModelError::InvalidParameter {
                name: "max_power",
                value: max_power,
                reason: "has to be not less than static_power",
            });
        }
        Ok(Self {
            max_power,
            static_power,
            startup_power: 0.,
            shutdown_power: 0.,
        })
    }

    pub fn with_startup_power(mut self, startup_power: f64) -> Result<Self, PowerModelError> {
        self.startup_power = validate_power(startup_power, "startup_power")?;
        Ok(self)
    }

    pub fn with_shutdown_power(mut self, shutdown_power: f64) -> Result<Self, PowerModelError> {
        self.shutdown_power = validate_power(shutdown_power, "shutdown_power")?;
        Ok(self)
    }

    pub fn max_power(&self) -> f64 {
        self.max_power
    }

    pub fn static_power(&self) -> f64 {
        self.static_power
    }
}

impl PowerModel for LinearPowerModel {
    fn measure(&self, is_active: bool, cpu_utilization: f64) -> PowerMeasurement {
        if !is_active {
            return PowerMeasurement::zero();
        }
        PowerMeasurement::new(self.static_power, (self.max_power - self.static_power) * cpu_utilization)
    }

    fn power(&self, host: &dyn HostActivity, utilization: f64) -> Result<f64, PowerModelError> {
        if !(0.0..=1.0).contains(&utilization) {
            return Err(PowerModelError::OutOfRange(utilization));
        }
        // Only a single startup and a single shutdown are accounted for, repeated cycles are not tracked.
        let startup_power = if host.has_ever_started() {
            self.startup_power
        } else {
            0.
        };
        let shutdown_power = if host.has_ever_started() && !host.is_active() {
            self.shutdown_power
        } else {
            0.
        };
        Ok(self.static_power + (self.max_power - self.static_power) * utilization + startup_power + shutdown_power)
    }

    fn startup_power(&self) -> f64 {
        self.startup_power
    }

    fn shutdown_power(&self) -> f64 {
        self.shutdown_power
    }
}
