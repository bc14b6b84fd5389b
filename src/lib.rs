//! Service Repository
//!
//! A repository of named RDF graphs ("named models") persisted in a RocksDB
//! dataset. Models are stored and replaced by name, read back individually or
//! as the union of every graph, and bulk-imported from RDF files (one graph
//! per file, named after the file).
//!
//! # Layout
//!
//! - [`rdf`]: term types, the in-memory [`Model`], prefix maps, parsers and
//!   serializers (RDF/XML, Turtle, N-Triples, N3)
//! - [`persistence`]: the RocksDB dataset
//! - [`repository`]: the [`ServiceRepository`] facade and file import
//! - [`config`]: directory layout and durability settings
//!
//! # Example
//!
//! ```rust,no_run
//! use service_repository::{RepositoryConfig, ServiceRepository};
//!
//! let repo = ServiceRepository::open(RepositoryConfig::default())?;
//!
//! let report = repo.import_model("services/", Some("TURTLE"))?;
//! for (path, err) in report.failed() {
//!     eprintln!("{}: {}", path.display(), err);
//! }
//!
//! if let Some(model) = repo.get_named_model(Some("geocoder.ttl"))? {
//!     println!("geocoder.ttl holds {} statements", model.len());
//! }
//!
//! let union = repo.get_model()?;
//! println!("{} statements in total", union.len());
//!
//! repo.close()?;
//! # Ok::<(), service_repository::RepositoryError>(())
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod persistence;
pub mod rdf;
pub mod repository;

pub use config::{ConfigError, ConfigResult, RepositoryConfig};

pub use persistence::{DatasetStorage, GraphMeta, StorageError, StorageResult};

pub use rdf::{
    BlankNode, Literal, Model, NamedNode, Object, ParseError, Predicate, PrefixMapping,
    RdfFormat, RdfParser, RdfSerializer, Subject, Triple,
};

pub use repository::{
    AddOutcome, GraphInfo, ImportEntry, ImportReport, RepositoryError, RepositoryResult,
    ServiceRepository, UNION_GRAPH,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), "0.1.0");
    }
}
