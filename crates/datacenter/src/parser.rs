//! Tools for loading configs from YAML files.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::{error::ConfigError, system::SystemConfig, workload::WorkloadPlan};

fn read_yaml<T: DeserializeOwned, P: AsRef<Path>>(file: P) -> Result<T, ConfigError> {
    let path = file.as_ref().to_path_buf();
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(source) => return Err(ConfigError::Io { path, source }),
    };
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml { path, source })
}

impl SystemConfig {
    /// Read [SystemConfig] from YAML file.
    pub fn from_yaml<P: AsRef<Path>>(file: P) -> Result<Self, ConfigError> {
        read_yaml(file)
    }
}

impl WorkloadPlan {
    /// Read [WorkloadPlan] from YAML file.
    pub fn from_yaml<P: AsRef<Path>>(file: P) -> Result<Self, ConfigError> {
        read_yaml(file)
    }
}
