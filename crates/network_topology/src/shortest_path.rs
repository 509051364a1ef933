//! Topology with delays along the lowest latency paths of a [Network].

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use dslab_core::{Id, Simulation};
use dslab_network::models::{ConstantBandwidthNetworkModel, TopologyAwareNetworkModel};
use dslab_network::{Link, Network};
use log::debug;

use crate::topology::{NetworkTopology, TopologyError};

/// Bandwidth of communication inside a single node.
const LOCAL_BANDWIDTH: f64 = 1e+9;

#[derive(Debug, Clone, Copy)]
struct LinkInfo {
    bandwidth: f64,
    latency: f64,
}

fn link_key(a: Id, b: Id) -> (Id, Id) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn node_name(node: Id) -> String {
    format!("node_{}", node)
}

/// Topology which computes delay as the latency of the best path between two nodes.
///
/// Every node is a separate network node with the same id as its location.
/// Networks are only queried for latency and never transfer data, so they live in a private simulation.
pub struct ShortestPathTopology {
    sim: Simulation,
    network: Network,
    generation: usize,
    nodes: BTreeSet<Id>,
    links: BTreeMap<(Id, Id), LinkInfo>,
}

impl Default for ShortestPathTopology {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortestPathTopology {
    pub fn new() -> Self {
        let mut sim = Simulation::new(0);
        let network = Network::new(Box::new(TopologyAwareNetworkModel::new()), sim.create_context("network_0"));
        Self {
            sim,
            network,
            generation: 0,
            nodes: BTreeSet::new(),
            links: BTreeMap::new(),
        }
    }

    /// Registers a node without links.
    pub fn add_node(&mut self, node: Id) {
        if self.register_node(node) {
            self.network.init_topology();
        }
    }

    pub fn nodes(&self) -> &BTreeSet<Id> {
        &self.nodes
    }

    /// Bandwidth of a direct link between two nodes.
    pub fn bandwidth(&self, src: Id, dst: Id) -> Option<f64> {
        self.links.get(&link_key(src, dst)).map(|link| link.bandwidth)
    }

    /// Delay between two nodes or `None` if they are unknown or not connected.
    pub fn try_delay(&self, src: Id, dst: Id) -> Option<f64> {
        if !self.is_reachable(src, dst) {
            return None;
        }
        Some(self.network.latency(src, dst))
    }

    fn register_node(&mut self, node: Id) -> bool {
        if !self.nodes.insert(node) {
            return false;
        }
        let name = node_name(node);
        self.network
            .add_node(&name, Box::new(ConstantBandwidthNetworkModel::new(LOCAL_BANDWIDTH, 0.)));
        self.network.set_location(node, &name);
        true
    }

    fn is_reachable(&self, src: Id, dst: Id) -> bool {
        if !self.nodes.contains(&src) || !self.nodes.contains(&dst) {
            return false;
        }
        let mut visited = BTreeSet::from([src]);
        let mut queue = VecDeque::from([src]);
        while let Some(node) = queue.pop_front() {
            if node == dst {
                return true;
            }
            for &(a, b) in self.links.keys() {
                let next = if a == node {
                    b
                } else if b == node {
                    a
                } else {
                    continue;
                };
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        false
    }

    /// Builds a new network from scratch since links can't be removed from an existing one.
    fn rebuild(&mut self) {
        self.generation += 1;
        let ctx = self.sim.create_context(format!("network_{}", self.generation));
        self.network = Network::new(Box::new(TopologyAwareNetworkModel::new()), ctx);
        let nodes = std::mem::take(&mut self.nodes);
        for node in nodes {
            self.register_node(node);
        }
        for (&(a, b), link) in self.links.iter() {
            self.network
                .add_link(&node_name(a), &node_name(b), Link::shared(link.bandwidth, link.latency));
        }
        self.network.init_topology();
        debug!(
            "rebuilt network with {} nodes and {} links",
            self.nodes.len(),
            self.links.len()
        );
    }
}

impl NetworkTopology for ShortestPathTopology {
    fn add_link(&mut self, src: Id, dst: Id, bandwidth: f64, latency: f64) -> Result<(), TopologyError> {
        if !bandwidth.is_finite() || bandwidth <= 0. {
            return Err(TopologyError::InvalidLink {
                src,
                dst,
                reason: "bandwidth has to be a positive finite number",
            });
        }
        if !latency.is_finite() || latency < 0. {
            return Err(TopologyError::InvalidLink {
                src,
                dst,
                reason: "latency has to be a non-negative finite number",
            });
        }
        if src == dst {
            return Err(TopologyError::InvalidLink {
                src,
                dst,
                reason: "link has to connect two different nodes",
            });
        }
        let replaced = self
            .links
            .insert(link_key(src, dst), LinkInfo { bandwidth, latency })
            .is_some();
        if replaced {
            self.rebuild();
        } else {
            self.register_node(src);
            self.register_node(dst);
            self.network
                .add_link(&node_name(src), &node_name(dst), Link::shared(bandwidth, latency));
            self.network.init_topology();
        }
        Ok(())
    }

    fn remove_link(&mut self, src: Id, dst: Id) {
        if self.links.remove(&link_key(src, dst)).is_some() {
            self.rebuild();
        }
    }

    fn delay(&self, src: Id, dst: Id) -> f64 {
        self.try_delay(src, dst).unwrap_or(0.)
    }
}
