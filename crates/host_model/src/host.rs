//! Model of a physical host.

use log::debug;

use crate::{
    error::PowerModelError,
    power_measurement::PowerMeasurement,
    power_model::{HostActivity, PowerModel},
    resources::{HostCapacity, ResourceDimension, ResourceVector, WorkloadDemand},
    suitability::{evaluate, evaluate_all, HostSuitability},
};

/// Lifecycle state of a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    NeverStarted,
    Active,
    Inactive,
}

/// Physical host with a fixed capacity, allocated resources and a power model.
pub struct Host {
    name: String,
    capacity: ResourceVector,
    allocated: ResourceVector,
    state: HostState,
    lazy_suitability: bool,
    startups: u64,
    power_model: Box<dyn PowerModel>,
}

impl Host {
    /// Creates a powered off host. Suitability is evaluated lazily by default.
    pub fn new(name: impl Into<String>, capacity: ResourceVector, power_model: Box<dyn PowerModel>) -> Self {
        Self {
            name: name.into(),
            capacity,
            allocated: ResourceVector::default(),
            state: HostState::NeverStarted,
            lazy_suitability: true,
            startups: 0,
            power_model,
        }
    }

    pub fn with_lazy_suitability(mut self, lazy: bool) -> Self {
        self.lazy_suitability = lazy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> ResourceVector {
        self.capacity
    }

    pub fn allocated(&self) -> ResourceVector {
        self.allocated
    }

    /// Resources which are not allocated yet.
    pub fn free(&self) -> ResourceVector {
        self.capacity.saturating_sub(&self.allocated)
    }

    pub fn state(&self) -> HostState {
        self.state
    }

    /// Number of times the host was started.
    pub fn startups(&self) -> u64 {
        self.startups
    }

    pub fn power_model(&self) -> &dyn PowerModel {
        self.power_model.as_ref()
    }

    /// Powers the host on. Does nothing for an active host.
    pub fn start(&mut self) {
        if self.state == HostState::Active {
            return;
        }
        debug!("host {} started", self.name);
        self.state = HostState::Active;
        self.startups += 1;
    }

    /// Powers the host off. Does nothing for a host which is not active.
    pub fn shutdown(&mut self) {
        if self.state != HostState::Active {
            return;
        }
        debug!("host {} shut down", self.name);
        self.state = HostState::Inactive;
    }

    /// Whether no resources are allocated on the host.
    pub fn is_idle(&self) -> bool {
        self.allocated == ResourceVector::default()
    }

    /// Fraction of allocated cores.
    pub fn cpu_utilization(&self) -> f64 {
        if self.capacity.compute == 0 {
            return 0.;
        }
        self.allocated.compute as f64 / self.capacity.compute as f64
    }

    /// Suitability of the host for a single workload.
    pub fn suitability_for<D: WorkloadDemand + ?Sized>(&self, demand: &D) -> HostSuitability {
        match self.powered_off() {
            Some(suitability) => suitability,
            None => evaluate(self, demand, self.lazy_suitability),
        }
    }

    /// Suitability of the host for a group of workloads placed together.
    pub fn suitability_for_group<D: WorkloadDemand>(&self, demands: &[D]) -> HostSuitability {
        match self.powered_off() {
            Some(suitability) => suitability,
            None => evaluate_all(self, demands, self.lazy_suitability),
        }
    }

    fn powered_off(&self) -> Option<HostSuitability> {
        if self.state == HostState::Active {
            return None;
        }
        Some(HostSuitability::with_reason(format!("host {} is powered off", self.name)))
    }

    /// Allocates resources for `demand` if the host is fully suitable for it.
    pub fn try_allocate<D: WorkloadDemand + ?Sized>(&mut self, demand: &D) -> HostSuitability {
        let suitability = self.suitability_for(demand);
        if suitability.fully() {
            self.allocated = self.allocated.saturating_add(&ResourceVector::requested_by(demand));
        }
        suitability
    }

    /// Allocates resources for all `demands` if the host is fully suitable for the whole group.
    pub fn try_allocate_group<D: WorkloadDemand>(&mut self, demands: &[D]) -> HostSuitability {
        let suitability = self.suitability_for_group(demands);
        if suitability.fully() {
            for demand in demands {
                self.allocated = self.allocated.saturating_add(&ResourceVector::requested_by(demand));
            }
        }
        suitability
    }

    /// Releases resources previously allocated for `demand`.
    pub fn release<D: WorkloadDemand + ?Sized>(&mut self, demand: &D) {
        self.allocated = self.allocated.saturating_sub(&ResourceVector::requested_by(demand));
    }

    /// Current power draw of the host.
    pub fn power_measurement(&self) -> PowerMeasurement {
        self.power_model.measure(self.is_active(), self.cpu_utilization())
    }

    /// Current total power of the host including one-shot lifecycle costs.
    pub fn power(&self) -> Result<f64, PowerModelError> {
        self.power_model.power(self, self.cpu_utilization())
    }
}

impl HostCapacity for Host {
    fn available(&self, dimension: ResourceDimension) -> u64 {
        self.free().get(dimension)
    }
}

impl HostActivity for Host {
    fn has_ever_started(&self) -> bool {
        self.state != HostState::NeverStarted
    }

    fn is_active(&self) -> bool {
        self.state == HostState::Active
    }
}
