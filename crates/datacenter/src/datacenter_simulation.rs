use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
    rc::Rc,
};

use dslab_core::{Id, Simulation};
use dslab_host_model::host::Host;
use dslab_topology::{
    shortest_path::ShortestPathTopology,
    topology::{NetworkTopology, NullTopology},
};

use crate::{
    datacenter::{Datacenter, Start},
    energy_stats::EnergyStats,
    error::ConfigError,
    system::{SystemConfig, BROKER},
    workload::WorkloadPlan,
};

const RESERVED_NAMES: [&str; 2] = ["datacenter", "root"];

pub struct DatacenterSimulation {
    pub sim: Simulation,
    system_config: SystemConfig,
    plan: WorkloadPlan,
}

impl DatacenterSimulation {
    pub fn new(seed: u64, system_config: SystemConfig, plan: WorkloadPlan) -> Self {
        DatacenterSimulation {
            sim: Simulation::new(seed),
            system_config,
            plan,
        }
    }

    fn node_id(&mut self, ids: &mut HashMap<String, Id>, name: &str) -> Result<Id, ConfigError> {
        if let Some(&id) = ids.get(name) {
            return Ok(id);
        }
        if RESERVED_NAMES.contains(&name) {
            return Err(ConfigError::Invalid(format!("name {name} is reserved")));
        }
        let id = self.sim.create_context(name).id();
        ids.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn run(mut self) -> Result<EnergyStats, ConfigError> {
        let interval = self.system_config.power_meter_interval;
        if !interval.is_finite() || interval <= 0. {
            return Err(ConfigError::Invalid(format!(
                "power_meter_interval has to be positive, got {interval}"
            )));
        }
        if let Some(workload) = self
            .plan
            .workloads
            .iter()
            .find(|workload| !(workload.start_time >= 0. && workload.duration >= 0.))
        {
            return Err(ConfigError::Invalid(format!(
                "workload start time and duration can't be negative, got {} and {}",
                workload.start_time, workload.duration
            )));
        }

        let mut ids: HashMap<String, Id> = HashMap::new();
        let mut hosts = BTreeMap::new();
        for host_config in self.system_config.hosts.clone() {
            if ids.contains_key(&host_config.name) || host_config.name == BROKER {
                return Err(ConfigError::Invalid(format!("duplicate host {}", host_config.name)));
            }
            let power_model = host_config.power.build().map_err(|source| ConfigError::PowerModel {
                host: host_config.name.clone(),
                source,
            })?;
            let id = self.node_id(&mut ids, &host_config.name)?;
            hosts.insert(
                id,
                Host::new(host_config.name, host_config.capacity, Box::new(power_model))
                    .with_lazy_suitability(host_config.lazy_suitability),
            );
        }
        let broker = self.node_id(&mut ids, BROKER)?;

        let topology: Box<dyn NetworkTopology> = if self.system_config.links.is_empty() {
            Box::new(NullTopology)
        } else {
            let mut topology = ShortestPathTopology::new();
            for link in self.system_config.links.clone() {
                let from = self.node_id(&mut ids, &link.from)?;
                let to = self.node_id(&mut ids, &link.to)?;
                topology
                    .add_link(from, to, link.bandwidth, link.latency)
                    .map_err(|source| ConfigError::Topology {
                        from: link.from,
                        to: link.to,
                        source,
                    })?;
            }
            Box::new(topology)
        };

        let datacenter = Rc::new(RefCell::new(Datacenter::new(
            self.plan.workloads,
            hosts,
            topology,
            broker,
            interval,
            self.system_config.shutdown_idle_hosts,
            self.sim.create_context("datacenter"),
        )));
        let datacenter_id = self.sim.add_handler("datacenter", datacenter.clone());

        self.sim.create_context("root").emit_now(Start {}, datacenter_id);
        self.sim.step_until_no_events();

        let stats = datacenter.borrow_mut().finalize();
        Ok(stats)
    }
}
