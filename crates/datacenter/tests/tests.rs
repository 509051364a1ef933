use dslab_datacenter::{
    datacenter_simulation::DatacenterSimulation,
    error::ConfigError,
    experiment::Experiment,
    system::{HostConfig, LinkConfig, PowerConfig, SystemConfig},
    workload::{WorkloadConfig, WorkloadPlan},
};
use dslab_host_model::resources::ResourceVector;

fn host(name: &str, cores: u64, power: PowerConfig) -> HostConfig {
    HostConfig {
        name: name.to_string(),
        capacity: ResourceVector::new(cores, 4096, 1000, 10000),
        power,
        lazy_suitability: true,
    }
}

fn workload(start_time: f64, duration: f64, cores: u64) -> WorkloadConfig {
    WorkloadConfig {
        start_time,
        duration,
        demand: ResourceVector::new(cores, 1024, 100, 1000),
    }
}

fn power(max_power: f64, static_power: f64) -> PowerConfig {
    PowerConfig {
        max_power,
        static_power,
        startup_power: 0.,
        shutdown_power: 0.,
    }
}

fn lifecycle_host() -> HostConfig {
    host(
        "host_0",
        4,
        PowerConfig {
            max_power: 200.,
            static_power: 100.,
            startup_power: 10.,
            shutdown_power: 5.,
        },
    )
}

#[test]
fn waiting_workload_keeps_host_on() {
    let system = SystemConfig {
        hosts: vec![lifecycle_host()],
        links: Vec::new(),
        power_meter_interval: 5.,
        shutdown_idle_hosts: true,
    };
    let plan = WorkloadPlan {
        workloads: vec![workload(0., 10., 2), workload(1., 10., 4)],
    };

    let stats = DatacenterSimulation::new(123, system, plan).run().unwrap();
    assert_eq!(stats.submitted_workloads, 2);
    assert_eq!(stats.placed_workloads, 2);
    assert_eq!(stats.completed_workloads, 2);
    assert_eq!(stats.rejected_workloads, 0);
    assert_eq!(stats.host_startups, 1);
    assert_eq!(stats.host_shutdowns, 1);
    assert!((stats.makespan - 20.).abs() < 1e-9);
    assert!((stats.static_energy - 2000.).abs() < 1e-9);
    assert!((stats.dynamic_energy - 1500.).abs() < 1e-9);
    assert!((stats.lifecycle_energy - 15.).abs() < 1e-9);
    assert!((stats.total_energy - 3515.).abs() < 1e-9);
    assert!((stats.average_power - 175.75).abs() < 1e-9);
    assert!((stats.host_energy["host_0"] - 3515.).abs() < 1e-9);
    assert!(!stats.power_samples.is_empty());
    assert!(stats.power_samples.iter().all(|sample| sample.time <= stats.makespan));
}

#[test]
fn idle_host_is_restarted_later() {
    let system = SystemConfig {
        hosts: vec![lifecycle_host()],
        links: Vec::new(),
        power_meter_interval: 5.,
        shutdown_idle_hosts: true,
    };
    let plan = WorkloadPlan {
        workloads: vec![workload(0., 10., 4), workload(15., 5., 4)],
    };

    let stats = DatacenterSimulation::new(123, system, plan).run().unwrap();
    assert_eq!(stats.host_startups, 2);
    assert_eq!(stats.host_shutdowns, 2);
    assert!((stats.makespan - 20.).abs() < 1e-9);
    assert!((stats.static_energy - 1500.).abs() < 1e-9);
    assert!((stats.dynamic_energy - 1500.).abs() < 1e-9);
    assert!((stats.lifecycle_energy - 30.).abs() < 1e-9);
    assert!((stats.total_energy - 3030.).abs() < 1e-9);
}

#[test]
fn oversized_workload_is_rejected() {
    let system = SystemConfig {
        hosts: vec![host("host_0", 4, power(200., 100.))],
        links: Vec::new(),
        power_meter_interval: 1.,
        shutdown_idle_hosts: false,
    };
    let plan = WorkloadPlan {
        workloads: vec![workload(0., 10., 8)],
    };

    let stats = DatacenterSimulation::new(123, system, plan).run().unwrap();
    assert_eq!(stats.submitted_workloads, 1);
    assert_eq!(stats.rejected_workloads, 1);
    assert_eq!(stats.placed_workloads, 0);
    assert_eq!(stats.host_startups, 0);
    assert_eq!(stats.total_energy, 0.);
}

#[test]
fn placement_delay_from_topology() {
    let system = SystemConfig {
        hosts: vec![host("host_0", 2, power(200., 100.))],
        links: vec![
            LinkConfig {
                from: "host_0".to_string(),
                to: "switch".to_string(),
                bandwidth: 1000.,
                latency: 0.5,
            },
            LinkConfig {
                from: "switch".to_string(),
                to: "broker".to_string(),
                bandwidth: 1000.,
                latency: 0.5,
            },
        ],
        power_meter_interval: 3.,
        shutdown_idle_hosts: false,
    };
    let plan = WorkloadPlan {
        workloads: vec![workload(0., 10., 2)],
    };

    let stats = DatacenterSimulation::new(123, system, plan).run().unwrap();
    assert!((stats.total_placement_delay - 1.).abs() < 1e-9);
    assert!((stats.makespan - 11.).abs() < 1e-9);
    assert!((stats.total_energy - 2200.).abs() < 1e-9);
    assert_eq!(stats.host_shutdowns, 0);
}

#[test]
fn first_fit_prefers_active_hosts() {
    let system = SystemConfig {
        hosts: vec![host("host_0", 4, power(200., 100.)), host("host_1", 4, power(200., 100.))],
        links: Vec::new(),
        power_meter_interval: 100.,
        shutdown_idle_hosts: false,
    };
    let plan = WorkloadPlan {
        workloads: vec![workload(0., 10., 2), workload(1., 10., 2), workload(2., 10., 2)],
    };

    let stats = DatacenterSimulation::new(123, system, plan).run().unwrap();
    assert_eq!(stats.placed_workloads, 3);
    assert_eq!(stats.host_startups, 2);
    assert!((stats.makespan - 12.).abs() < 1e-9);
}

#[test]
fn invalid_configs() {
    let system = SystemConfig {
        hosts: vec![host("host_0", 4, power(50., 100.))],
        links: Vec::new(),
        power_meter_interval: 1.,
        shutdown_idle_hosts: false,
    };
    let result = DatacenterSimulation::new(123, system, WorkloadPlan::default()).run();
    assert!(matches!(result, Err(ConfigError::PowerModel { .. })));

    let system = SystemConfig {
        hosts: vec![host("host_0", 4, power(200., 100.))],
        links: Vec::new(),
        power_meter_interval: 0.,
        shutdown_idle_hosts: false,
    };
    let result = DatacenterSimulation::new(123, system, WorkloadPlan::default()).run();
    assert!(matches!(result, Err(ConfigError::Invalid(_))));

    let system = SystemConfig {
        hosts: vec![host("host_0", 4, power(200., 100.))],
        links: vec![LinkConfig {
            from: "host_0".to_string(),
            to: "broker".to_string(),
            bandwidth: -1.,
            latency: 0.,
        }],
        power_meter_interval: 1.,
        shutdown_idle_hosts: false,
    };
    let result = DatacenterSimulation::new(123, system, WorkloadPlan::default()).run();
    assert!(matches!(result, Err(ConfigError::Topology { .. })));

    assert!(matches!(
        SystemConfig::from_yaml("no_such_file.yaml"),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn system_config_from_yaml() {
    let yaml = r#"
hosts:
  - name: host_0
    capacity:
      compute: 8
      memory: 16384
      bandwidth: 1000
      storage: 100000
    power:
      max_power: 250
      static_power: 120
      startup_power: 30
plan_version: ignored
"#;
    let system: SystemConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(system.hosts.len(), 1);
    assert!(system.hosts[0].lazy_suitability);
    assert_eq!(system.hosts[0].power.shutdown_power, 0.);
    assert_eq!(system.power_meter_interval, 60.);
    assert!(!system.shutdown_idle_hosts);
    let model = system.hosts[0].power.build().unwrap();
    assert_eq!(model.max_power(), 250.);
    assert_eq!(model.static_power(), 120.);
}

#[test]
fn experiment_runs_every_combination() {
    let good = SystemConfig {
        hosts: vec![host("host_0", 4, power(200., 100.))],
        links: Vec::new(),
        power_meter_interval: 5.,
        shutdown_idle_hosts: true,
    };
    let broken = SystemConfig {
        hosts: vec![host("host_0", 4, power(100., 200.))],
        ..good.clone()
    };
    let plan = WorkloadPlan {
        workloads: vec![workload(0., 10., 4)],
    };

    let results = Experiment::new(
        123,
        vec![("b_good".to_string(), good), ("a_broken".to_string(), broken)],
        vec![("single".to_string(), plan)],
    )
    .run(2);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].system, "a_broken");
    assert!(results[0].stats.is_none());
    assert!(results[0].error.is_some());
    let stats = results[1].stats.as_ref().unwrap();
    assert!((stats.total_energy - 2000.).abs() < 1e-9);
}
