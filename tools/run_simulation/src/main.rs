use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use dslab_datacenter::{
    error::ConfigError,
    experiment::{Experiment, RunResult},
    system::SystemConfig,
    workload::WorkloadPlan,
};
use env_logger::Builder;
use log::error;
use serde::Deserialize;

#[derive(Deserialize)]
struct Config {
    systems: Vec<PathBuf>,
    plans: Vec<PathBuf>,
}

/// Runs every workload plan on every system and prints energy stats.
#[derive(Parser, Debug)]
struct Args {
    /// Path to config with lists of systems and plans.
    #[arg(short, long)]
    config: PathBuf,

    /// Path to file with results.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Random seed.
    #[arg(long, default_value_t = 123)]
    seed: u64,

    /// Number of threads.
    #[arg(long, default_value_t = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))]
    threads: usize,
}

fn filename(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_stem()
        .map(|name| name.to_string_lossy().split('.').next().unwrap_or_default().to_string())
        .unwrap_or_default()
}

fn load(args: &Args) -> Result<(Vec<(String, SystemConfig)>, Vec<(String, WorkloadPlan)>), ConfigError> {
    let content = std::fs::read_to_string(&args.config).map_err(|source| ConfigError::Io {
        path: args.config.clone(),
        source,
    })?;
    let config: Config = serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
        path: args.config.clone(),
        source,
    })?;
    let systems = config
        .systems
        .iter()
        .enumerate()
        .map(|(i, path)| -> Result<_, ConfigError> {
            Ok((format!("{}_{}", i, filename(path)), SystemConfig::from_yaml(path)?))
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;
    let plans = config
        .plans
        .iter()
        .enumerate()
        .map(|(i, path)| -> Result<_, ConfigError> {
            Ok((format!("{}_{}", i, filename(path)), WorkloadPlan::from_yaml(path)?))
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;
    Ok((systems, plans))
}

fn print_table(results: &[RunResult]) {
    let width = results
        .iter()
        .map(|x| x.system.len() + x.plan.len() + 3)
        .max()
        .unwrap_or(0)
        .max("run".len());
    println!(
        "| {: <width$} | energy, kJ | avg power, W | makespan, s | placed | rejected | startups |",
        "run",
        width = width
    );
    println!(
        "|-{:-<width$}-|------------|--------------|-------------|--------|----------|----------|",
        "",
        width = width
    );
    for row in results {
        let name = format!("{} / {}", row.system, row.plan);
        match &row.stats {
            Some(stats) => println!(
                "| {: <width$} | {: >10.3} | {: >12.3} | {: >11.3} | {: >6} | {: >8} | {: >8} |",
                name,
                stats.total_energy / 1000.,
                stats.average_power,
                stats.makespan,
                stats.placed_workloads,
                stats.rejected_workloads,
                stats.host_startups,
                width = width
            ),
            None => println!(
                "| {: <width$} | error: {}",
                name,
                row.error.as_deref().unwrap_or("unknown"),
                width = width
            ),
        }
    }
}

fn main() -> ExitCode {
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    let args = Args::parse();
    let (systems, plans) = match load(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let results = Experiment::new(args.seed, systems, plans).run(args.threads);

    if let Some(output) = &args.output {
        let written = serde_json::to_string_pretty(&results)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                File::create(output)
                    .and_then(|mut file| file.write_all(json.as_bytes()))
                    .map_err(|e| e.to_string())
            });
        if let Err(e) = written {
            error!("can't write results to {}: {e}", output.display());
            return ExitCode::FAILURE;
        }
    }

    print_table(&results);
    ExitCode::SUCCESS
}
