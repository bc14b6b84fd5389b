//! Repository configuration
//!
//! Loaded with the following priority (highest first):
//! 1. Environment variables (`SERVICE_REPOSITORY_*`)
//! 2. YAML config file, when one is given
//! 3. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Overrides `service_dir`
pub const ENV_SERVICE_DIR: &str = "SERVICE_REPOSITORY_SERVICE_DIR";
/// Overrides `dataset_dir`
pub const ENV_DATASET_DIR: &str = "SERVICE_REPOSITORY_DATASET_DIR";
/// Overrides `sync_writes` (`true`/`false`/`1`/`0`)
pub const ENV_SYNC_WRITES: &str = "SERVICE_REPOSITORY_SYNC_WRITES";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML error
    #[error("Invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Filesystem layout and durability settings of a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Directory for service artifacts
    pub service_dir: PathBuf,
    /// Directory of the RocksDB dataset
    pub dataset_dir: PathBuf,
    /// Sync the write-ahead log on every write
    pub sync_writes: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            service_dir: PathBuf::from("service_repository/services/"),
            dataset_dir: PathBuf::from("service_repository/dataset/"),
            sync_writes: true,
        }
    }
}

impl RepositoryConfig {
    /// Default layout placed under `root` instead of the working directory
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            service_dir: root.join("services"),
            dataset_dir: root.join("dataset"),
            ..Self::default()
        }
    }

    /// Parse a YAML document; missing keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load defaults, then the optional YAML file, then environment overrides
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => {
                debug!("Loading repository config from {}", path.display());
                let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_yaml_str(&yaml)?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in `load`)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(ENV_SERVICE_DIR) {
            self.service_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_DATASET_DIR) {
            self.dataset_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup(ENV_SYNC_WRITES) {
            match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.sync_writes = true,
                "0" | "false" | "no" => self.sync_writes = false,
                other => warn!("Ignoring {}={:?}: expected a boolean", ENV_SYNC_WRITES, other),
            }
        }
    }
}
