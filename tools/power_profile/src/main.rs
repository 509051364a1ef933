use std::{io::Write, path::PathBuf, process::ExitCode};

use clap::Parser;
use dslab_datacenter::system::SystemConfig;
use dslab_host_model::{host::Host, power_model::PowerModel};
use env_logger::Builder;
use log::error;

/// Prints power draw of every host from a system config over a range of utilization levels.
#[derive(Parser, Debug)]
struct Args {
    /// Path to system config.
    #[arg(short, long)]
    system: PathBuf,

    /// Number of utilization steps between 0 and 1.
    #[arg(long, default_value_t = 10)]
    steps: u32,
}

fn main() -> ExitCode {
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    let args = Args::parse();
    let system = match SystemConfig::from_yaml(&args.system) {
        Ok(system) => system,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let steps = args.steps.max(1);

    for host_config in system.hosts {
        let power_model = match host_config.power.build() {
            Ok(power_model) => power_model,
            Err(e) => {
                error!("host {}: {e}", host_config.name);
                return ExitCode::FAILURE;
            }
        };
        let mut host = Host::new(host_config.name, host_config.capacity, Box::new(power_model));
        host.start();

        println!("{}", host.name());
        println!("| utilization | static, W | dynamic, W | total, W | with startup, W |");
        println!("|-------------|-----------|------------|----------|-----------------|");
        for step in 0..=steps {
            let utilization = step as f64 / steps as f64;
            let measurement = host.power_model().measure(true, utilization);
            let legacy = match host.power_model().power(&host, utilization) {
                Ok(power) => power,
                Err(e) => {
                    error!("{e}");
                    return ExitCode::FAILURE;
                }
            };
            println!(
                "| {: >11.2} | {: >9.2} | {: >10.2} | {: >8.2} | {: >15.2} |",
                utilization,
                measurement.static_power,
                measurement.dynamic_power,
                measurement.total(),
                legacy
            );
        }
        println!();
    }
    ExitCode::SUCCESS
}
