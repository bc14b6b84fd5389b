//! Named-graph repository
//!
//! [`ServiceRepository`] owns the dataset handle and exposes graph-level
//! operations: replace a named model, read one back, read the union of all of
//! them, clear one, and import RDF files.
//!
//! The repository is an explicit context object. Open it once with
//! [`ServiceRepository::open`], share it by reference (it is `Send + Sync`),
//! and call [`ServiceRepository::close`] to flush on shutdown. It performs no
//! locking of its own: concurrent writers to the same name race, and the last
//! write batch wins.

mod import;

pub use import::{ImportEntry, ImportReport};

use crate::config::{ConfigError, RepositoryConfig};
use crate::persistence::{DatasetStorage, GraphMeta, StorageError};
use crate::rdf::{Model, ParseError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Reserved name of the union-of-all-graphs view
pub const UNION_GRAPH: &str = "urn:x-arq:UnionGraph";

/// Repository errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// No graph name was given
    #[error("Graph name is missing")]
    MissingName,

    /// Graph name is empty or contains a NUL byte
    #[error("Invalid graph name: {0:?}")]
    InvalidName(String),

    /// The union graph name cannot be written to
    #[error("Graph name {0} is reserved for the union view")]
    ReservedName(String),

    /// Import path does not exist
    #[error("No such file or directory: {0}")]
    PathNotFound(PathBuf),

    /// Directory entry that is not a regular file
    #[error("Not a regular file, skipped: {0}")]
    UnsupportedEntry(PathBuf),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Summary of a stored named graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphInfo {
    /// Graph name
    pub name: String,
    /// Number of triples
    pub triple_count: u64,
    /// Number of namespace prefixes
    pub prefix_count: u64,
    /// Last replace, in milliseconds since the Unix epoch
    pub updated_at_ms: i64,
}

impl GraphInfo {
    fn new(name: impl Into<String>, meta: GraphMeta) -> Self {
        Self {
            name: name.into(),
            triple_count: meta.triple_count,
            prefix_count: meta.prefix_count,
            updated_at_ms: meta.updated_at,
        }
    }

    /// Last replace as a UTC timestamp
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.updated_at_ms)
    }
}

/// Result of [`ServiceRepository::add_model`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    /// Graph name written
    pub name: String,
    /// Number of triples now stored under the name
    pub triple_count: usize,
    /// The graph that was overwritten, if the name was already in use
    pub replaced: Option<GraphInfo>,
}

/// Repository of named RDF graphs backed by an on-disk dataset
pub struct ServiceRepository {
    config: RepositoryConfig,
    storage: DatasetStorage,
}

impl ServiceRepository {
    /// Create the service and dataset directories if needed and open the dataset
    pub fn open(config: RepositoryConfig) -> RepositoryResult<Self> {
        std::fs::create_dir_all(&config.service_dir)?;
        std::fs::create_dir_all(&config.dataset_dir)?;

        let storage = DatasetStorage::open(&config.dataset_dir, config.sync_writes)?;
        info!(
            "Service repository ready (services: {}, dataset: {})",
            config.service_dir.display(),
            config.dataset_dir.display()
        );

        Ok(Self { config, storage })
    }

    /// Configuration the repository was opened with
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Replace the named graph `name` with the statements and prefixes of `model`
    ///
    /// Prior contents are removed first; statements never accumulate across
    /// calls. The write batch is synced to the WAL when `sync_writes` is set.
    pub fn add_model(&self, model: &Model, name: Option<&str>) -> RepositoryResult<AddOutcome> {
        let name = Self::writable_name(name, "add")?;

        let previous = self.storage.replace_graph(name, model)?;

        if previous.is_some() {
            info!("Replaced model {} ({} triples)", name, model.len());
        } else {
            debug!("Added model {} ({} triples)", name, model.len());
        }

        Ok(AddOutcome {
            name: name.to_string(),
            triple_count: model.len(),
            replaced: previous.map(|meta| GraphInfo::new(name, meta)),
        })
    }

    /// Union of all named graphs, read at call time
    ///
    /// The returned model is a snapshot; changing it does not touch the
    /// repository.
    pub fn get_model(&self) -> RepositoryResult<Model> {
        Ok(self.storage.load_union()?)
    }

    /// The named graph `name`, or `None` if nothing is stored under it
    ///
    /// Asking for [`UNION_GRAPH`] returns the union view.
    pub fn get_named_model(&self, name: Option<&str>) -> RepositoryResult<Option<Model>> {
        let name = Self::required_name(name, "get")?;
        if name == UNION_GRAPH {
            return self.get_model().map(Some);
        }

        let model = self.storage.load_graph(name)?;
        if model.is_none() {
            info!("The model {} does not exist in the service repository", name);
        }
        Ok(model)
    }

    /// Remove all statements and prefixes of `name`
    ///
    /// Returns false when the graph does not exist.
    pub fn clear_named_model(&self, name: Option<&str>) -> RepositoryResult<bool> {
        let name = Self::writable_name(name, "clear")?;

        if !self.storage.clear_graph(name)? {
            info!("The model {} does not exist in the service repository", name);
            return Ok(false);
        }

        info!("Cleared model {}", name);
        Ok(true)
    }

    /// Whether a graph with at least one statement is stored under `name`
    pub fn contains_named_model(&self, name: &str) -> RepositoryResult<bool> {
        Ok(self.storage.graph_meta(name)?.is_some())
    }

    /// Metadata of one stored graph
    pub fn graph_info(&self, name: &str) -> RepositoryResult<Option<GraphInfo>> {
        Ok(self
            .storage
            .graph_meta(name)?
            .map(|meta| GraphInfo::new(name, meta)))
    }

    /// All stored graphs, ordered by name
    pub fn list_named_models(&self) -> RepositoryResult<Vec<GraphInfo>> {
        Ok(self
            .storage
            .list_graphs()?
            .into_iter()
            .map(|(name, meta)| GraphInfo::new(name, meta))
            .collect())
    }

    /// Flush the dataset and release the handle
    pub fn close(self) -> RepositoryResult<()> {
        self.storage.flush()?;
        info!("Service repository closed");
        Ok(())
    }

    fn required_name<'a>(name: Option<&'a str>, action: &str) -> RepositoryResult<&'a str> {
        let Some(name) = name else {
            info!("Cannot {} the model because the given name is missing", action);
            return Err(RepositoryError::MissingName);
        };
        if name.is_empty() || name.contains('\0') {
            info!("Cannot {} the model: invalid name {:?}", action, name);
            return Err(RepositoryError::InvalidName(name.to_string()));
        }
        Ok(name)
    }

    fn writable_name<'a>(name: Option<&'a str>, action: &str) -> RepositoryResult<&'a str> {
        let name = Self::required_name(name, action)?;
        if name == UNION_GRAPH {
            info!("Cannot {} the model: {} is the union view", action, name);
            return Err(RepositoryError::ReservedName(name.to_string()));
        }
        Ok(name)
    }
}
