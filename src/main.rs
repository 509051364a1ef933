use std::{io::Write, process::ExitCode};

use env_logger::Builder;
use log::error;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use dslab_datacenter::{
    datacenter_simulation::DatacenterSimulation,
    system::{HostConfig, PowerConfig, SystemConfig},
    workload::{WorkloadConfig, WorkloadPlan},
};
use dslab_host_model::resources::ResourceVector;

fn make_host(name: &str, cores: u64, memory: u64, max_power: f64, static_power: f64) -> HostConfig {
    HostConfig {
        name: name.to_string(),
        capacity: ResourceVector::new(cores, memory, 10000, 1_000_000),
        power: PowerConfig {
            max_power,
            static_power,
            startup_power: 50.,
            shutdown_power: 20.,
        },
        lazy_suitability: true,
    }
}

fn make_plan(rng: &mut Pcg64, count: usize) -> WorkloadPlan {
    let mut start_time = 0.;
    let workloads = (0..count)
        .map(|_| {
            start_time += rng.gen_range(0.0..30.0);
            WorkloadConfig {
                start_time,
                duration: rng.gen_range(60.0..600.0),
                demand: ResourceVector::new(
                    rng.gen_range(1..=8),
                    rng.gen_range(1..=16) * 1024,
                    rng.gen_range(10..=1000),
                    rng.gen_range(1..=100) * 1024,
                ),
            }
        })
        .collect();
    WorkloadPlan { workloads }
}

fn main() -> ExitCode {
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    let system = SystemConfig {
        hosts: vec![
            make_host("host_0", 16, 65536, 400., 180.),
            make_host("host_1", 16, 65536, 400., 180.),
            make_host("host_2", 32, 131072, 650., 260.),
        ],
        links: Vec::new(),
        power_meter_interval: 60.,
        shutdown_idle_hosts: true,
    };
    let mut rng = Pcg64::seed_from_u64(123);
    let plan = make_plan(&mut rng, 100);

    match DatacenterSimulation::new(123, system, plan).run() {
        Ok(mut stats) => {
            stats.power_samples.clear();
            match serde_yaml::to_string(&stats) {
                Ok(yaml) => println!("Energy stats:\n{}", yaml),
                Err(e) => {
                    error!("can't serialize stats: {e}");
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
