//! Datacenter which places submitted workloads on hosts and meters their power.

use std::collections::{BTreeMap, VecDeque};

use serde::Serialize;

use dslab_core::{cast, log_debug, log_info, log_warn, Event, EventHandler, Id, SimulationContext};
use dslab_host_model::{
    host::Host,
    power_measurement::PowerMeasurement,
    power_model::HostActivity,
    resources::ResourceVector,
};
use dslab_topology::topology::NetworkTopology;

use crate::{
    energy_stats::EnergyStats,
    workload::{Workload, WorkloadConfig},
};

/// Event which starts submitting planned workloads.
#[derive(Clone, Serialize)]
pub struct Start {}

/// Event to place a workload on some host.
#[derive(Clone, Serialize)]
pub struct SubmitWorkload {
    pub workload: Workload,
}

/// Workload finished its execution on a host and its resources can be released.
#[derive(Clone, Serialize)]
pub struct WorkloadCompleted {
    pub workload_id: usize,
    pub host: Id,
}

#[derive(Clone, Serialize)]
struct MeasurePower {}

struct RunningWorkload {
    host: Id,
    demand: ResourceVector,
}

pub struct Datacenter {
    plan: Vec<WorkloadConfig>,
    hosts: BTreeMap<Id, Host>,
    topology: Box<dyn NetworkTopology>,
    broker: Id,
    power_meter_interval: f64,
    shutdown_idle_hosts: bool,
    waiting: VecDeque<Workload>,
    running: BTreeMap<usize, RunningWorkload>,
    pending_submissions: usize,
    last_energy_update: f64,
    stats: EnergyStats,
    ctx: SimulationContext,
}

impl Datacenter {
    pub fn new(
        plan: Vec<WorkloadConfig>,
        hosts: BTreeMap<Id, Host>,
        topology: Box<dyn NetworkTopology>,
        broker: Id,
        power_meter_interval: f64,
        shutdown_idle_hosts: bool,
        ctx: SimulationContext,
    ) -> Self {
        Self {
            plan,
            hosts,
            topology,
            broker,
            power_meter_interval,
            shutdown_idle_hosts,
            waiting: VecDeque::new(),
            running: BTreeMap::new(),
            pending_submissions: 0,
            last_energy_update: 0.,
            stats: EnergyStats::new(),
            ctx,
        }
    }

    pub fn id(&self) -> Id {
        self.ctx.id()
    }

    pub fn hosts(&self) -> &BTreeMap<Id, Host> {
        &self.hosts
    }

    pub fn stats(&self) -> &EnergyStats {
        &self.stats
    }

    /// Total power currently drawn by all hosts.
    pub fn power_measurement(&self) -> PowerMeasurement {
        self.hosts.values().map(|host| host.power_measurement()).sum()
    }

    fn on_start(&mut self) {
        for (id, workload) in self.plan.iter().enumerate() {
            self.ctx.emit(
                SubmitWorkload {
                    workload: Workload {
                        id,
                        demand: workload.demand,
                        duration: workload.duration,
                    },
                },
                self.ctx.id(),
                workload.start_time,
            );
        }
        self.pending_submissions = self.plan.len();
        log_info!(self.ctx, "scheduled {} workloads", self.pending_submissions);
        self.ctx.emit_now(MeasurePower {}, self.ctx.id());
    }

    /// Accumulates energy drawn since the last update, must be called before any host changes.
    fn update_energy(&mut self) {
        let now = self.ctx.time();
        let duration = now - self.last_energy_update;
        if duration > 0. {
            for host in self.hosts.values() {
                self.stats.register_energy(host.name(), host.power_measurement(), duration);
            }
        }
        self.last_energy_update = now;
    }

    fn has_activity(&self) -> bool {
        self.pending_submissions > 0 || !self.running.is_empty() || !self.waiting.is_empty()
    }

    fn on_submit(&mut self, workload: Workload) {
        self.pending_submissions -= 1;
        self.stats.register_submission();
        if !self
            .hosts
            .values()
            .any(|host| workload.demand.fits_into(&host.capacity()))
        {
            log_warn!(self.ctx, "workload {} doesn't fit into any host, rejected", workload.id);
            self.stats.register_rejection();
            return;
        }
        if !self.try_place(&workload) {
            log_debug!(self.ctx, "workload {} is waiting for resources", workload.id);
            self.waiting.push_back(workload);
        }
    }

    /// First fit among active hosts, then among powered off hosts with enough capacity.
    fn try_place(&mut self, workload: &Workload) -> bool {
        let mut explanations = Vec::new();
        let mut chosen = None;
        for (&id, host) in self.hosts.iter_mut().filter(|(_id, host)| host.is_active()) {
            let suitability = host.try_allocate(&workload.demand);
            if suitability.fully() {
                chosen = Some(id);
                break;
            }
            explanations.push(format!("{}: {}", host.name(), suitability));
        }
        if chosen.is_none() {
            for (&id, host) in self.hosts.iter_mut().filter(|(_id, host)| !host.is_active()) {
                if !workload.demand.fits_into(&host.free()) {
                    continue;
                }
                host.start();
                self.stats
                    .register_startup(host.name(), host.power_model().startup_power());
                log_debug!(self.ctx, "started host {}", host.name());
                let suitability = host.try_allocate(&workload.demand);
                if suitability.fully() {
                    chosen = Some(id);
                    break;
                }
                explanations.push(format!("{}: {}", host.name(), suitability));
            }
        }

        let Some(host_id) = chosen else {
            log_debug!(
                self.ctx,
                "no suitable host for workload {}: {}",
                workload.id,
                explanations.join(" | ")
            );
            return false;
        };
        let delay = self.topology.delay(self.broker, host_id);
        log_debug!(
            self.ctx,
            "workload {} placed on host {} with delay {}",
            workload.id,
            self.hosts[&host_id].name(),
            delay
        );
        self.stats.register_placement(delay);
        self.running.insert(
            workload.id,
            RunningWorkload {
                host: host_id,
                demand: workload.demand,
            },
        );
        self.ctx.emit(
            WorkloadCompleted {
                workload_id: workload.id,
                host: host_id,
            },
            self.ctx.id(),
            delay + workload.duration,
        );
        true
    }

    fn on_completed(&mut self, workload_id: usize, host_id: Id) {
        let Some(workload) = self.running.remove(&workload_id) else {
            log_warn!(self.ctx, "completed unknown workload {}", workload_id);
            return;
        };
        debug_assert_eq!(workload.host, host_id);
        self.stats.register_completion(self.ctx.time());
        let Some(host) = self.hosts.get_mut(&workload.host) else {
            log_warn!(self.ctx, "workload {} completed on unknown host {}", workload_id, host_id);
            return;
        };
        host.release(&workload.demand);
        log_debug!(self.ctx, "workload {} completed on host {}", workload_id, host.name());

        let waiting = std::mem::take(&mut self.waiting);
        for workload in waiting {
            if !self.try_place(&workload) {
                self.waiting.push_back(workload);
            }
        }

        // Only a host which is still idle after placing waiting workloads is shut down.
        if !self.shutdown_idle_hosts {
            return;
        }
        if let Some(host) = self.hosts.get_mut(&workload.host).filter(|host| host.is_active() && host.is_idle()) {
            host.shutdown();
            self.stats
                .register_shutdown(host.name(), host.power_model().shutdown_power());
            log_debug!(self.ctx, "host {} is idle, shut down", host.name());
        }
    }

    fn on_measure_power(&mut self) {
        if !self.has_activity() {
            log_info!(self.ctx, "no more workloads, power meter stopped");
            return;
        }
        self.update_energy();
        let power = self.power_measurement();
        self.stats.register_power_sample(self.ctx.time(), power);
        self.ctx
            .emit(MeasurePower {}, self.ctx.id(), self.power_meter_interval);
    }

    /// Returns stats of the simulation.
    ///
    /// Energy is accounted until the last workload completion, hosts left powered on after it are not charged.
    pub fn finalize(&mut self) -> EnergyStats {
        self.stats.finalize();
        self.stats.clone()
    }
}

impl EventHandler for Datacenter {
    fn on(&mut self, event: Event) {
        cast!(match event.data {
            Start {} => {
                self.on_start();
            }
            SubmitWorkload { workload } => {
                self.update_energy();
                self.on_submit(workload);
            }
            WorkloadCompleted { workload_id, host } => {
                self.update_energy();
                self.on_completed(workload_id, host);
            }
            MeasurePower {} => {
                self.on_measure_power();
            }
        })
    }
}
