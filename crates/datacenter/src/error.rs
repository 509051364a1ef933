use std::path::PathBuf;

use thiserror::Error;

use dslab_host_model::error::PowerModelError;
use dslab_topology::topology::TopologyError;

/// Errors of loading and validating a simulation setup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("can't read file {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("can't parse YAML from file {}: {source}", path.display())]
    Yaml { path: PathBuf, source: serde_yaml::Error },

    #[error("host {host}: {source}")]
    PowerModel { host: String, source: PowerModelError },

    #[error("link {from} - {to}: {source}")]
    Topology {
        from: String,
        to: String,
        source: TopologyError,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
