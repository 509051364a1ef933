use std::{
    io::Write,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::{Duration, Instant},
};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use threadpool::ThreadPool;

use crate::{
    datacenter_simulation::DatacenterSimulation, energy_stats::EnergyStats, system::SystemConfig,
    workload::WorkloadPlan,
};

struct Run {
    system: (String, SystemConfig),
    plan: (String, WorkloadPlan),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunResult {
    pub system: String,
    pub plan: String,
    /// Stats of a successful run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<EnergyStats>,
    /// Description of a setup error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Runs every plan on every system in parallel.
pub struct Experiment {
    seed: u64,
    systems: Vec<(String, SystemConfig)>,
    plans: Vec<(String, WorkloadPlan)>,
}

impl Experiment {
    pub fn new(seed: u64, systems: Vec<(String, SystemConfig)>, plans: Vec<(String, WorkloadPlan)>) -> Self {
        Self { seed, systems, plans }
    }

    pub fn run(self, threads: usize) -> Vec<RunResult> {
        let runs = self
            .systems
            .into_iter()
            .cartesian_product(self.plans)
            .map(|(system, plan)| Run { system, plan })
            .collect::<Vec<_>>();

        let total_runs = runs.len();

        let finished_run_atomic = Arc::new(AtomicUsize::new(0));
        let results = Arc::new(Mutex::new(Vec::new()));

        let pool = ThreadPool::new(threads.max(1));
        let start_time = Instant::now();
        let seed = self.seed;
        for run in runs.into_iter() {
            let finished_run_atomic = finished_run_atomic.clone();
            let results = results.clone();
            pool.execute(move || {
                let sim = DatacenterSimulation::new(seed, run.system.1, run.plan.1);
                let (stats, error) = match sim.run() {
                    Ok(stats) => (Some(stats), None),
                    Err(e) => (None, Some(e.to_string())),
                };

                if let Ok(mut results) = results.lock() {
                    results.push(RunResult {
                        system: run.system.0,
                        plan: run.plan.0,
                        stats,
                        error,
                    });
                }

                let finished_runs = finished_run_atomic.fetch_add(1, Ordering::SeqCst) + 1;

                let elapsed = start_time.elapsed();
                let remaining = Duration::from_secs_f64(
                    elapsed.as_secs_f64() / finished_runs as f64 * (total_runs - finished_runs) as f64,
                );
                print!("\r{}", " ".repeat(70));
                print!(
                    "\rFinished {}/{} [{}%] runs in {:.2?}, remaining time: {:.2?}",
                    finished_runs,
                    total_runs,
                    (finished_runs as f64 * 100. / total_runs as f64).round() as i32,
                    elapsed,
                    remaining
                );
                let _ = std::io::stdout().flush();
            });
        }

        pool.join();

        print!("\r{}", " ".repeat(70));
        println!("\rFinished {} runs in {:.2?}", total_runs, start_time.elapsed());

        let mut results = results
            .lock()
            .map(|results| results.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone());
        results.sort_by_cached_key(|run| (run.system.clone(), run.plan.clone()));
        results
    }
}
