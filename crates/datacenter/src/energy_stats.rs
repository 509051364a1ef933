//! Energy and placement stats from a completed simulation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use dslab_host_model::power_measurement::PowerMeasurement;

/// Total power draw of all hosts at some moment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PowerSample {
    pub time: f64,
    pub power: PowerMeasurement,
}

/// Energy and placement stats from a completed simulation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EnergyStats {
    /// Time of the last workload completion.
    pub makespan: f64,
    /// Total energy in joules, including startup and shutdown costs.
    pub total_energy: f64,
    /// Energy drawn by active hosts regardless of their load.
    pub static_energy: f64,
    /// Energy drawn proportionally to the load.
    pub dynamic_energy: f64,
    /// One-shot energy spent on host startups and shutdowns.
    pub lifecycle_energy: f64,
    /// Average total power during [makespan](EnergyStats::makespan).
    pub average_power: f64,
    /// Energy of each host.
    pub host_energy: BTreeMap<String, f64>,
    pub submitted_workloads: usize,
    pub placed_workloads: usize,
    pub completed_workloads: usize,
    /// Workloads which don't fit into any host even when it's empty.
    pub rejected_workloads: usize,
    pub host_startups: u64,
    pub host_shutdowns: u64,
    /// Sum of network delays between the broker and chosen hosts.
    pub total_placement_delay: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub power_samples: Vec<PowerSample>,
}

impl EnergyStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `power` drawn by `host` during `duration` seconds.
    pub fn register_energy(&mut self, host: &str, power: PowerMeasurement, duration: f64) {
        let energy = power.scale(duration);
        self.static_energy += energy.static_power;
        self.dynamic_energy += energy.dynamic_power;
        *self.host_energy.entry(host.to_string()).or_default() += energy.total();
    }

    pub fn register_startup(&mut self, host: &str, energy: f64) {
        self.host_startups += 1;
        self.register_lifecycle_energy(host, energy);
    }

    pub fn register_shutdown(&mut self, host: &str, energy: f64) {
        self.host_shutdowns += 1;
        self.register_lifecycle_energy(host, energy);
    }

    fn register_lifecycle_energy(&mut self, host: &str, energy: f64) {
        self.lifecycle_energy += energy;
        *self.host_energy.entry(host.to_string()).or_default() += energy;
    }

    pub fn register_submission(&mut self) {
        self.submitted_workloads += 1;
    }

    pub fn register_placement(&mut self, delay: f64) {
        self.placed_workloads += 1;
        self.total_placement_delay += delay;
    }

    pub fn register_rejection(&mut self) {
        self.rejected_workloads += 1;
    }

    pub fn register_completion(&mut self, time: f64) {
        self.completed_workloads += 1;
        self.makespan = self.makespan.max(time);
    }

    pub fn register_power_sample(&mut self, time: f64, power: PowerMeasurement) {
        self.power_samples.push(PowerSample { time, power });
    }

    /// Compute totals after the last registered event.
    pub fn finalize(&mut self) {
        self.total_energy = self.static_energy + self.dynamic_energy + self.lifecycle_energy;
        self.average_power = if self.makespan > 0. {
            self.total_energy / self.makespan
        } else {
            0.
        };
    }
}
