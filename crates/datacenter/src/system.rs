use serde::{Deserialize, Serialize};

use dslab_host_model::{error::PowerModelError, power_model::LinearPowerModel, resources::ResourceVector};

/// Name of the node which submits workloads, can be used in [LinkConfig].
pub const BROKER: &str = "broker";

/// Calibration of a [LinearPowerModel], all values in watts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PowerConfig {
    pub max_power: f64,
    pub static_power: f64,
    #[serde(default)]
    pub startup_power: f64,
    #[serde(default)]
    pub shutdown_power: f64,
}

impl PowerConfig {
    pub fn build(&self) -> Result<LinearPowerModel, PowerModelError> {
        LinearPowerModel::new(self.max_power, self.static_power)?
            .with_startup_power(self.startup_power)?
            .with_shutdown_power(self.shutdown_power)
    }
}

fn default_lazy_suitability() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HostConfig {
    pub name: String,
    pub capacity: ResourceVector,
    pub power: PowerConfig,
    #[serde(default = "default_lazy_suitability")]
    pub lazy_suitability: bool,
}

/// Undirected link between two named nodes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinkConfig {
    pub from: String,
    pub to: String,
    pub bandwidth: f64,
    pub latency: f64,
}

fn default_power_meter_interval() -> f64 {
    60.
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SystemConfig {
    pub hosts: Vec<HostConfig>,
    /// Links of the network, without links every delay is zero.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkConfig>,
    /// Interval between power samples in seconds.
    #[serde(default = "default_power_meter_interval")]
    pub power_meter_interval: f64,
    /// Whether to power off hosts which have nothing allocated.
    #[serde(default)]
    pub shutdown_idle_hosts: bool,
}
