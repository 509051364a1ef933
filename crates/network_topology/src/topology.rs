//! Trait for a network topology.

use dslab_core::Id;
use thiserror::Error;

/// Errors of topology mutations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TopologyError {
    #[error("invalid link {src} -> {dst}: {reason}")]
    InvalidLink { src: Id, dst: Id, reason: &'static str },
}

/// Trait for a network topology.
pub trait NetworkTopology {
    /// Adds an undirected link between `src` and `dst`.
    /// * `bandwidth` --- link bandwidth.
    /// * `latency` --- link latency in seconds.
    fn add_link(&mut self, src: Id, dst: Id, bandwidth: f64, latency: f64) -> Result<(), TopologyError>;

    /// Removes a link between `src` and `dst` if it exists.
    fn remove_link(&mut self, src: Id, dst: Id);

    /// Communication delay between two nodes in seconds.
    ///
    /// Returns `0` for nodes which are unknown or not connected.
    fn delay(&self, src: Id, dst: Id) -> f64;
}

/// Topology without links, every delay is zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTopology;

impl NetworkTopology for NullTopology {
    fn add_link(&mut self, _src: Id, _dst: Id, _bandwidth: f64, _latency: f64) -> Result<(), TopologyError> {
        Ok(())
    }

    fn remove_link(&mut self, _src: Id, _dst: Id) {}

    fn delay(&self, _src: Id, _dst: Id) -> f64 {
        0.
    }
}
