pub mod datacenter;
pub mod datacenter_simulation;
pub mod energy_stats;
pub mod error;
pub mod experiment;
pub mod parser;
pub mod system;
pub mod workload;
