//! Network topologies used to compute communication delay between simulation components.

pub mod shortest_path;
pub mod topology;
