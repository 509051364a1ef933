//! Instantaneous power draw of a host.

use std::{
    iter::Sum,
    ops::{Add, AddAssign},
};

use serde::{Deserialize, Serialize};

/// Power draw (in watts) split into the idle floor and the utilization-proportional part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerMeasurement {
    /// Power drawn by an active host regardless of its load.
    pub static_power: f64,
    /// Power drawn on top of the static part, proportional to the load.
    pub dynamic_power: f64,
}

impl PowerMeasurement {
    pub fn new(static_power: f64, dynamic_power: f64) -> Self {
        Self {
            static_power,
            dynamic_power,
        }
    }

    /// Measurement of a host which draws no power.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn total(&self) -> f64 {
        self.static_power + self.dynamic_power
    }

    /// Multiplies both parts by `factor`, e.g. by a time interval to get energy in joules.
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            static_power: self.static_power * factor,
            dynamic_power: self.dynamic_power * factor,
        }
    }
}

impl Add for PowerMeasurement {
    type Output = PowerMeasurement;

    fn add(self, rhs: PowerMeasurement) -> PowerMeasurement {
        PowerMeasurement {
            static_power: self.static_power + rhs.static_power,
            dynamic_power: self.dynamic_power + rhs.dynamic_power,
        }
    }
}

impl AddAssign for PowerMeasurement {
    fn add_assign(&mut self, rhs: PowerMeasurement) {
        *self = *self + rhs;
    }
}

impl Sum for PowerMeasurement {
    fn sum<I: Iterator<Item = PowerMeasurement>>(iter: I) -> Self {
        iter.fold(PowerMeasurement::zero(), Add::add)
    }
}
