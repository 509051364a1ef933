//! Resource dimensions and amounts checked when placing a workload on a host.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Independently checked resource axis of a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceDimension {
    /// Number of cores.
    Compute,
    /// Memory in megabytes.
    Memory,
    /// Network bandwidth in megabits per second.
    Bandwidth,
    /// Storage in megabytes.
    Storage,
}

impl ResourceDimension {
    /// Order in which dimensions are checked and reported.
    pub const CHECK_ORDER: [ResourceDimension; 4] = [
        ResourceDimension::Compute,
        ResourceDimension::Memory,
        ResourceDimension::Storage,
        ResourceDimension::Bandwidth,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            ResourceDimension::Compute => 0,
            ResourceDimension::Memory => 1,
            ResourceDimension::Bandwidth => 2,
            ResourceDimension::Storage => 3,
        }
    }
}

impl fmt::Display for ResourceDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceDimension::Compute => "COMPUTE",
            ResourceDimension::Memory => "MEMORY",
            ResourceDimension::Bandwidth => "BANDWIDTH",
            ResourceDimension::Storage => "STORAGE",
        };
        f.write_str(name)
    }
}

/// Source of currently available host capacity.
pub trait HostCapacity {
    /// Amount of the resource which is still free on a host.
    fn available(&self, dimension: ResourceDimension) -> u64;
}

/// Source of resource amounts requested by a workload.
pub trait WorkloadDemand {
    /// Amount of the resource a workload needs.
    fn requested(&self, dimension: ResourceDimension) -> u64;
}

/// Amount of every resource dimension.
///
/// Used both as a host capacity and as a workload demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceVector {
    /// Number of cores.
    #[serde(default)]
    pub compute: u64,
    /// Memory in megabytes.
    #[serde(default)]
    pub memory: u64,
    /// Network bandwidth in megabits per second.
    #[serde(default)]
    pub bandwidth: u64,
    /// Storage in megabytes.
    #[serde(default)]
    pub storage: u64,
}

impl ResourceVector {
    pub fn new(compute: u64, memory: u64, bandwidth: u64, storage: u64) -> Self {
        Self {
            compute,
            memory,
            bandwidth,
            storage,
        }
    }

    /// Snapshot of the capacity currently available on a host.
    pub fn available_on<H: HostCapacity + ?Sized>(host: &H) -> Self {
        Self {
            compute: host.available(ResourceDimension::Compute),
            memory: host.available(ResourceDimension::Memory),
            bandwidth: host.available(ResourceDimension::Bandwidth),
            storage: host.available(ResourceDimension::Storage),
        }
    }

    /// Snapshot of the amounts requested by a workload.
    pub fn requested_by<D: WorkloadDemand + ?Sized>(demand: &D) -> Self {
        Self {
            compute: demand.requested(ResourceDimension::Compute),
            memory: demand.requested(ResourceDimension::Memory),
            bandwidth: demand.requested(ResourceDimension::Bandwidth),
            storage: demand.requested(ResourceDimension::Storage),
        }
    }

    /// Returns the amount of a single dimension.
    pub fn get(&self, dimension: ResourceDimension) -> u64 {
        match dimension {
            ResourceDimension::Compute => self.compute,
            ResourceDimension::Memory => self.memory,
            ResourceDimension::Bandwidth => self.bandwidth,
            ResourceDimension::Storage => self.storage,
        }
    }

    fn zip_with(&self, other: &Self, f: impl Fn(u64, u64) -> u64) -> Self {
        Self {
            compute: f(self.compute, other.compute),
            memory: f(self.memory, other.memory),
            bandwidth: f(self.bandwidth, other.bandwidth),
            storage: f(self.storage, other.storage),
        }
    }

    pub fn saturating_add(&self, other: &Self) -> Self {
        self.zip_with(other, u64::saturating_add)
    }

    pub fn saturating_sub(&self, other: &Self) -> Self {
        self.zip_with(other, u64::saturating_sub)
    }

    /// Whether every dimension of `self` is not greater than the same dimension of `capacity`.
    pub fn fits_into(&self, capacity: &Self) -> bool {
        ResourceDimension::CHECK_ORDER
            .iter()
            .all(|&dimension| self.get(dimension) <= capacity.get(dimension))
    }
}

impl HostCapacity for ResourceVector {
    fn available(&self, dimension: ResourceDimension) -> u64 {
        self.get(dimension)
    }
}

impl WorkloadDemand for ResourceVector {
    fn requested(&self, dimension: ResourceDimension) -> u64 {
        self.get(dimension)
    }
}
