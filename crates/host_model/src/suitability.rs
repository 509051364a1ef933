//! Suitability of a host for placing workloads.

use std::{collections::BTreeSet, fmt};

use serde::Serialize;

use crate::{
    error::SuitabilityError,
    resources::{HostCapacity, ResourceDimension, ResourceVector, WorkloadDemand},
};

/// Message returned by [HostSuitability::explain] for a fully suitable host.
pub const FULLY_SUITABLE_MESSAGE: &str = "Host is fully suitable for the last requested workload";

/// Fine-grained information whether a host can accommodate a workload.
///
/// Every dimension flag is `true` if the requirement is met and `false` if it is not met
/// or was not evaluated at all because an earlier dimension already failed under lazy evaluation.
/// A default value is unsuitable on every dimension, which can't be told apart from
/// a result which was never evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostSuitability {
    passed: [bool; 4],
    reasons: BTreeSet<String>,
}

impl HostSuitability {
    /// Creates a result for a host which is unsuitable for a reason not tied to any dimension.
    pub fn unsuitable_because(reason: impl Into<String>) -> Result<Self, SuitabilityError> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(SuitabilityError::InvalidReason);
        }
        Ok(Self::with_reason(reason))
    }

    /// Creates an unsuitable result with a reason already known to be non-blank.
    pub(crate) fn with_reason(reason: String) -> Self {
        debug_assert!(!reason.trim().is_empty());
        Self {
            passed: [false; 4],
            reasons: BTreeSet::from([reason]),
        }
    }

    pub(crate) fn set(&mut self, dimension: ResourceDimension, suitable: bool) {
        self.passed[dimension.index()] = suitable;
    }

    pub fn for_dimension(&self, dimension: ResourceDimension) -> bool {
        self.passed[dimension.index()]
    }

    pub fn for_compute(&self) -> bool {
        self.for_dimension(ResourceDimension::Compute)
    }

    pub fn for_memory(&self) -> bool {
        self.for_dimension(ResourceDimension::Memory)
    }

    pub fn for_storage(&self) -> bool {
        self.for_dimension(ResourceDimension::Storage)
    }

    pub fn for_bandwidth(&self) -> bool {
        self.for_dimension(ResourceDimension::Bandwidth)
    }

    /// Whether all resource requirements are met.
    pub fn fully(&self) -> bool {
        self.passed.iter().all(|&suitable| suitable)
    }

    pub fn is_fully_suitable(&self) -> bool {
        self.fully()
    }

    /// Explicit reasons attached to this result, in lexicographic order.
    pub fn reasons(&self) -> impl Iterator<Item = &str> {
        self.reasons.iter().map(String::as_str)
    }

    /// Combined suitability of a single host for both workloads.
    ///
    /// Dimensions are joined with logical AND, explicit reasons are merged.
    /// The operation is commutative, associative and idempotent.
    pub fn combine(&self, other: &HostSuitability) -> HostSuitability {
        let mut passed = [false; 4];
        for (i, suitable) in passed.iter_mut().enumerate() {
            *suitable = self.passed[i] && other.passed[i];
        }
        HostSuitability {
            passed,
            reasons: self.reasons.union(&other.reasons).cloned().collect(),
        }
    }

    /// Human-readable explanation of the result.
    pub fn explain(&self) -> String {
        if self.fully() {
            return FULLY_SUITABLE_MESSAGE.to_string();
        }
        if !self.reasons.is_empty() {
            return self.reasons.iter().map(String::as_str).collect::<Vec<_>>().join("; ");
        }
        let lacking = ResourceDimension::CHECK_ORDER
            .iter()
            .filter(|&&dimension| !self.for_dimension(dimension))
            .map(|dimension| dimension.to_string())
            .collect::<Vec<_>>();
        format!("lack of {}", lacking.join(", "))
    }
}

impl fmt::Display for HostSuitability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.explain())
    }
}

/// Checks whether `host` has enough available capacity for `demand`.
///
/// Dimensions are checked in [ResourceDimension::CHECK_ORDER]. With `lazy` set, checking stops
/// at the first failed dimension and the remaining ones stay unsuitable.
pub fn evaluate<H, D>(host: &H, demand: &D, lazy: bool) -> HostSuitability
where
    H: HostCapacity + ?Sized,
    D: WorkloadDemand + ?Sized,
{
    let mut suitability = HostSuitability::default();
    for dimension in ResourceDimension::CHECK_ORDER {
        let suitable = host.available(dimension) >= demand.requested(dimension);
        suitability.set(dimension, suitable);
        if lazy && !suitable {
            break;
        }
    }
    suitability
}

/// Checks whether `host` can accommodate all `demands` at once.
///
/// Each demand is evaluated against the capacity left after reserving the previous ones,
/// then all results are combined. An empty group yields the default unsuitable result.
pub fn evaluate_all<H, D>(host: &H, demands: &[D], lazy: bool) -> HostSuitability
where
    H: HostCapacity + ?Sized,
    D: WorkloadDemand,
{
    let mut remaining = ResourceVector::available_on(host);
    let mut combined: Option<HostSuitability> = None;
    for demand in demands {
        let suitability = evaluate(&remaining, demand, lazy);
        remaining = remaining.saturating_sub(&ResourceVector::requested_by(demand));
        combined = Some(match combined {
            Some(acc) => acc.combine(&suitability),
            None => suitability,
        });
    }
    combined.unwrap_or_default()
}
