//! Workloads submitted to a datacenter.

use serde::{Deserialize, Serialize};

use dslab_host_model::resources::ResourceVector;

/// Workload which occupies host resources for a fixed duration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Workload {
    pub id: usize,
    pub demand: ResourceVector,
    /// Execution time in seconds.
    pub duration: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Submission time in seconds.
    pub start_time: f64,
    pub duration: f64,
    pub demand: ResourceVector,
}

/// List of workloads to submit during a simulation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WorkloadPlan {
    #[serde(default)]
    pub workloads: Vec<WorkloadConfig>,
}
