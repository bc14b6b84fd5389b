//! RocksDB dataset storage
//!
//! One RocksDB database holds every named graph. Three column families:
//!
//! - `triples`: key = graph name ‖ 0x00 ‖ bincode(triple), empty value
//! - `prefixes`: key = graph name ‖ 0x00 ‖ prefix, value = namespace IRI
//! - `graphs`: key = graph name, value = bincode([`GraphMeta`])
//!
//! Encoding the whole triple into the key gives set semantics for free and
//! lets a graph be dropped with a single range delete.

use crate::rdf::{BlankNode, Literal, Model, NamedNode, Object, Predicate, RdfError, Subject, Triple};
use chrono::Utc;
use rocksdb::{
    ColumnFamily, ColumnFamilyDescriptor, Direction, IteratorMode, Options, Snapshot, WriteBatch,
    WriteOptions, DB,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

const CF_TRIPLES: &str = "triples";
const CF_PREFIXES: &str = "prefixes";
const CF_GRAPHS: &str = "graphs";

const KEY_SEPARATOR: u8 = 0x00;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// RocksDB error
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Column family error
    #[error("Column family error: {0}")]
    ColumnFamily(String),

    /// Stored data could not be decoded
    #[error("Corrupt entry: {0}")]
    Corrupt(String),

    /// Stored term no longer validates
    #[error("Invalid stored term: {0}")]
    InvalidTerm(#[from] RdfError),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Per-graph metadata kept in the `graphs` column family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphMeta {
    /// Number of stored triples
    pub triple_count: u64,
    /// Number of stored prefixes
    pub prefix_count: u64,
    /// Last replace, in milliseconds since the Unix epoch
    pub updated_at: i64,
}

#[derive(Debug, Serialize, Deserialize)]
enum StoredTerm {
    Iri(String),
    Blank(String),
    Literal {
        value: String,
        datatype: String,
        language: Option<String>,
    },
}

/// Serialized triple for storage
#[derive(Debug, Serialize, Deserialize)]
struct StoredTriple {
    subject: StoredTerm,
    predicate: String,
    object: StoredTerm,
}

impl StoredTriple {
    fn from_triple(triple: &Triple) -> Self {
        let subject = match &triple.subject {
            Subject::NamedNode(n) => StoredTerm::Iri(n.as_str().to_string()),
            Subject::BlankNode(b) => StoredTerm::Blank(b.as_str().to_string()),
        };
        let object = match &triple.object {
            Object::NamedNode(n) => StoredTerm::Iri(n.as_str().to_string()),
            Object::BlankNode(b) => StoredTerm::Blank(b.as_str().to_string()),
            Object::Literal(l) => StoredTerm::Literal {
                value: l.value().to_string(),
                datatype: l.datatype_iri().to_string(),
                language: l.language().map(str::to_string),
            },
        };

        Self {
            subject,
            predicate: triple.predicate.as_str().to_string(),
            object,
        }
    }

    fn into_triple(self) -> StorageResult<Triple> {
        let subject = match self.subject {
            StoredTerm::Iri(iri) => NamedNode::new(&iri)?.into(),
            StoredTerm::Blank(id) => BlankNode::from_id(&id)?.into(),
            StoredTerm::Literal { value, .. } => {
                return Err(StorageError::Corrupt(format!("literal subject {value:?}")))
            }
        };
        let object = match self.object {
            StoredTerm::Iri(iri) => NamedNode::new(&iri)?.into(),
            StoredTerm::Blank(id) => BlankNode::from_id(&id)?.into(),
            StoredTerm::Literal {
                value,
                language: Some(language),
                ..
            } => Literal::new_language_tagged_literal(value, language)?.into(),
            StoredTerm::Literal {
                value, datatype, ..
            } => Literal::new_typed_literal(value, NamedNode::new(&datatype)?).into(),
        };

        Ok(Triple::new(subject, Predicate::new(&self.predicate)?, object))
    }
}

/// RocksDB-backed dataset of named graphs
pub struct DatasetStorage {
    /// RocksDB instance
    db: Arc<DB>,
    /// Sync the WAL on every write batch
    sync_writes: bool,
}

impl DatasetStorage {
    /// Open or create the dataset at `path`
    pub fn open(path: impl AsRef<Path>, sync_writes: bool) -> StorageResult<Self> {
        let path = path.as_ref();
        info!("Opening dataset storage at: {}", path.display());

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts.set_wal_recovery_mode(rocksdb::DBRecoveryMode::PointInTime);

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new("default", Options::default()),
            ColumnFamilyDescriptor::new(CF_TRIPLES, Self::cf_options()),
            ColumnFamilyDescriptor::new(CF_PREFIXES, Self::cf_options()),
            ColumnFamilyDescriptor::new(CF_GRAPHS, Self::cf_options()),
        ];

        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;

        info!("Dataset storage opened successfully");

        Ok(Self {
            db: Arc::new(db),
            sync_writes,
        })
    }

    fn cf_options() -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts
    }

    fn cf(&self, name: &str) -> StorageResult<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StorageError::ColumnFamily(name.to_string()))
    }

    fn write_options(&self) -> WriteOptions {
        let mut opts = WriteOptions::default();
        opts.set_sync(self.sync_writes);
        opts
    }

    /// Replace the contents and prefixes of `graph` in one atomic batch
    ///
    /// Returns the metadata of the contents that were replaced, if any. An
    /// empty model leaves no trace of the graph.
    pub fn replace_graph(&self, graph: &str, model: &Model) -> StorageResult<Option<GraphMeta>> {
        let triples_cf = self.cf(CF_TRIPLES)?;
        let prefixes_cf = self.cf(CF_PREFIXES)?;
        let graphs_cf = self.cf(CF_GRAPHS)?;

        let previous = self.graph_meta(graph)?;

        let (start, end) = Self::graph_range(graph);
        let mut batch = WriteBatch::default();
        batch.delete_range_cf(triples_cf, &start, &end);
        batch.delete_range_cf(prefixes_cf, &start, &end);

        for triple in model {
            let key = Self::triple_key(graph, triple)?;
            batch.put_cf(triples_cf, key, b"");
        }

        if model.is_empty() {
            batch.delete_cf(graphs_cf, graph.as_bytes());
        } else {
            for (prefix, iri) in model.prefixes().iter() {
                batch.put_cf(prefixes_cf, Self::prefix_key(graph, prefix), iri.as_bytes());
            }
            let meta = GraphMeta {
                triple_count: model.len() as u64,
                prefix_count: model.prefixes().len() as u64,
                updated_at: Utc::now().timestamp_millis(),
            };
            batch.put_cf(graphs_cf, graph.as_bytes(), bincode::serialize(&meta)?);
        }

        self.db.write_opt(batch, &self.write_options())?;

        debug!("Replaced graph {} with {} triples", graph, model.len());

        Ok(previous)
    }

    /// Remove every triple and prefix of `graph`; returns false if it held none
    pub fn clear_graph(&self, graph: &str) -> StorageResult<bool> {
        let replaced = self.replace_graph(graph, &Model::new())?;
        Ok(replaced.is_some())
    }

    /// Metadata of a stored graph
    pub fn graph_meta(&self, graph: &str) -> StorageResult<Option<GraphMeta>> {
        let cf = self.cf(CF_GRAPHS)?;
        match self.db.get_cf(cf, graph.as_bytes())? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    /// All stored graphs with their metadata, ordered by name
    pub fn list_graphs(&self) -> StorageResult<Vec<(String, GraphMeta)>> {
        self.read_graph_list(&self.db.snapshot())
    }

    /// Load one graph, or `None` if nothing is stored under `graph`
    ///
    /// Triples and prefixes are read from one snapshot, so a concurrent
    /// replace is seen either entirely or not at all.
    pub fn load_graph(&self, graph: &str) -> StorageResult<Option<Model>> {
        self.read_graph(&self.db.snapshot(), graph)
    }

    /// Load the union of all graphs from one snapshot
    ///
    /// Prefixes are merged in graph-name order; later graphs win on conflicts.
    pub fn load_union(&self) -> StorageResult<Model> {
        let snapshot = self.db.snapshot();
        let mut union = Model::new();

        for (name, _) in self.read_graph_list(&snapshot)? {
            if let Some(model) = self.read_graph(&snapshot, &name)? {
                union.extend_from(&model);
            }
        }

        Ok(union)
    }

    fn read_graph_list(&self, snapshot: &Snapshot<'_>) -> StorageResult<Vec<(String, GraphMeta)>> {
        let cf = self.cf(CF_GRAPHS)?;
        let mut graphs = Vec::new();

        for item in snapshot.iterator_cf(cf, IteratorMode::Start) {
            let (key, value) = item?;
            let name = String::from_utf8(key.to_vec())
                .map_err(|e| StorageError::Corrupt(format!("graph name: {e}")))?;
            graphs.push((name, bincode::deserialize(&value)?));
        }

        Ok(graphs)
    }

    fn read_graph(&self, snapshot: &Snapshot<'_>, graph: &str) -> StorageResult<Option<Model>> {
        if snapshot.get_cf(self.cf(CF_GRAPHS)?, graph.as_bytes())?.is_none() {
            return Ok(None);
        }

        let (start, end) = Self::graph_range(graph);
        let mut model = Model::new();

        for (key, _) in self.scan(snapshot, CF_TRIPLES, &start, &end)? {
            let stored: StoredTriple = bincode::deserialize(&key[start.len()..])?;
            model.insert(stored.into_triple()?);
        }

        for (key, value) in self.scan(snapshot, CF_PREFIXES, &start, &end)? {
            let (prefix, iri) = Self::decode_prefix_entry(&key[start.len()..], &value)?;
            model.prefixes_mut().set_prefix(prefix, iri);
        }

        Ok(Some(model))
    }

    /// Flush all column families to disk
    pub fn flush(&self) -> StorageResult<()> {
        for name in [CF_TRIPLES, CF_PREFIXES, CF_GRAPHS] {
            self.db.flush_cf(self.cf(name)?)?;
        }
        debug!("Flushed dataset storage to disk");
        Ok(())
    }

    /// Entries of `cf` with keys in `[start, end)`
    fn scan(
        &self,
        snapshot: &Snapshot<'_>,
        cf: &str,
        start: &[u8],
        end: &[u8],
    ) -> StorageResult<Vec<(Box<[u8]>, Box<[u8]>)>> {
        let cf = self.cf(cf)?;
        let mut entries = Vec::new();
        for item in snapshot.iterator_cf(cf, IteratorMode::From(start, Direction::Forward)) {
            let (key, value) = item?;
            if &key[..] >= end {
                break;
            }
            entries.push((key, value));
        }
        Ok(entries)
    }

    /// Key range `[name ‖ 0x00, name ‖ 0x01)` covering one graph
    fn graph_range(graph: &str) -> (Vec<u8>, Vec<u8>) {
        let mut start = graph.as_bytes().to_vec();
        start.push(KEY_SEPARATOR);
        let mut end = graph.as_bytes().to_vec();
        end.push(KEY_SEPARATOR + 1);
        (start, end)
    }

    fn triple_key(graph: &str, triple: &Triple) -> StorageResult<Vec<u8>> {
        let mut key = graph.as_bytes().to_vec();
        key.push(KEY_SEPARATOR);
        key.extend(bincode::serialize(&StoredTriple::from_triple(triple))?);
        Ok(key)
    }

    fn prefix_key(graph: &str, prefix: &str) -> Vec<u8> {
        let mut key = graph.as_bytes().to_vec();
        key.push(KEY_SEPARATOR);
        key.extend_from_slice(prefix.as_bytes());
        key
    }

    fn decode_prefix_entry(prefix: &[u8], iri: &[u8]) -> StorageResult<(String, String)> {
        let prefix = std::str::from_utf8(prefix)
            .map_err(|e| StorageError::Corrupt(format!("prefix: {e}")))?;
        let iri = std::str::from_utf8(iri).map_err(|e| StorageError::Corrupt(format!("prefix IRI: {e}")))?;
        Ok((prefix.to_string(), iri.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn triple(s: &str, o: &str) -> Triple {
        Triple::new(
            NamedNode::new(&format!("http://example.org/{s}")).unwrap().into(),
            Predicate::new("http://example.org/p").unwrap(),
            Literal::new_simple_literal(o).into(),
        )
    }

    #[test]
    fn test_storage_open() {
        let temp_dir = TempDir::new().unwrap();
        let storage = DatasetStorage::open(temp_dir.path(), false).unwrap();
        assert!(storage.list_graphs().unwrap().is_empty());
    }

    #[test]
    fn test_replace_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = DatasetStorage::open(temp_dir.path(), false).unwrap();

        let mut model = Model::from_triples([triple("a", "1"), triple("b", "2")]);
        model.prefixes_mut().set_prefix("ex", "http://example.org/");

        assert_eq!(storage.replace_graph("g1", &model).unwrap(), None);

        let loaded = storage.load_graph("g1").unwrap().unwrap();
        assert!(loaded.same_triples(&model));
        assert_eq!(loaded.prefixes(), model.prefixes());

        let meta = storage.graph_meta("g1").unwrap().unwrap();
        assert_eq!(meta.triple_count, 2);
        assert_eq!(meta.prefix_count, 1);
    }

    #[test]
    fn test_replace_does_not_append() {
        let temp_dir = TempDir::new().unwrap();
        let storage = DatasetStorage::open(temp_dir.path(), false).unwrap();

        storage
            .replace_graph("g", &Model::from_triples([triple("a", "1")]))
            .unwrap();
        let previous = storage
            .replace_graph("g", &Model::from_triples([triple("b", "2")]))
            .unwrap();

        assert_eq!(previous.map(|m| m.triple_count), Some(1));
        let loaded = storage.load_graph("g").unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains(&triple("b", "2")));
    }

    #[test]
    fn test_graph_isolation_with_shared_name_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let storage = DatasetStorage::open(temp_dir.path(), false).unwrap();

        storage
            .replace_graph("svc", &Model::from_triples([triple("a", "1")]))
            .unwrap();
        storage
            .replace_graph("svc.ttl", &Model::from_triples([triple("b", "2")]))
            .unwrap();

        assert_eq!(storage.load_graph("svc").unwrap().unwrap().len(), 1);
        assert!(storage.clear_graph("svc").unwrap());
        assert_eq!(storage.load_graph("svc.ttl").unwrap().unwrap().len(), 1);
        assert!(!storage.clear_graph("svc").unwrap());
        assert!(storage.load_graph("svc").unwrap().is_none());
    }

    #[test]
    fn test_union_dedups_and_merges_prefixes() {
        let temp_dir = TempDir::new().unwrap();
        let storage = DatasetStorage::open(temp_dir.path(), false).unwrap();

        let mut a = Model::from_triples([triple("a", "1"), triple("shared", "x")]);
        a.prefixes_mut().set_prefix("ex", "http://example.org/a/");
        let mut b = Model::from_triples([triple("b", "2"), triple("shared", "x")]);
        b.prefixes_mut().set_prefix("ex", "http://example.org/b/");

        storage.replace_graph("a", &a).unwrap();
        storage.replace_graph("b", &b).unwrap();

        let union = storage.load_union().unwrap();
        assert_eq!(union.len(), 3);
        assert_eq!(union.prefixes().get_iri("ex").unwrap(), "http://example.org/b/");
    }

    #[test]
    fn test_blank_nodes_and_literals_survive_storage() {
        let temp_dir = TempDir::new().unwrap();
        let storage = DatasetStorage::open(temp_dir.path(), false).unwrap();

        let node = BlankNode::new();
        let xsd_int = NamedNode::new("http://www.w3.org/2001/XMLSchema#integer").unwrap();
        let model = Model::from_triples([
            Triple::new(
                node.clone().into(),
                Predicate::new("http://example.org/label").unwrap(),
                Literal::new_language_tagged_literal("Dienst", "de").unwrap().into(),
            ),
            Triple::new(
                NamedNode::new("http://example.org/s").unwrap().into(),
                Predicate::new("http://example.org/count").unwrap(),
                Literal::new_typed_literal("3", xsd_int).into(),
            ),
            Triple::new(
                NamedNode::new("http://example.org/s").unwrap().into(),
                Predicate::new("http://example.org/ref").unwrap(),
                node.into(),
            ),
        ]);

        storage.replace_graph("g", &model).unwrap();
        assert!(storage.load_graph("g").unwrap().unwrap().same_triples(&model));
    }

    #[test]
    fn test_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let storage = DatasetStorage::open(temp_dir.path(), true).unwrap();
            storage
                .replace_graph("g", &Model::from_triples([triple("a", "1")]))
                .unwrap();
            storage.flush().unwrap();
        }

        let storage = DatasetStorage::open(temp_dir.path(), true).unwrap();
        let graphs = storage.list_graphs().unwrap();
        assert_eq!(graphs.len(), 1);
        assert_eq!(graphs[0].0, "g");
        assert_eq!(storage.load_graph("g").unwrap().unwrap().len(), 1);
    }

    #[test]
    fn test_reads_never_mix_replacements() {
        let temp_dir = TempDir::new().unwrap();
        let storage = DatasetStorage::open(temp_dir.path(), false).unwrap();

        let mut old = Model::from_triples([triple("old", "1")]);
        old.prefixes_mut().set_prefix("old", "http://example.org/old/");
        let mut new = Model::from_triples([triple("new", "1"), triple("new", "2")]);
        new.prefixes_mut().set_prefix("new", "http://example.org/new/");
        storage.replace_graph("g", &old).unwrap();

        let check = |loaded: &Model| {
            let prefix = loaded.prefixes().iter().next().map(|(p, _)| p.to_string());
            match prefix.as_deref() {
                Some("old") => assert!(loaded.same_triples(&old)),
                Some("new") => assert!(loaded.same_triples(&new)),
                other => panic!("unexpected prefixes {other:?}"),
            }
        };

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..200 {
                    let model = if i % 2 == 0 { &new } else { &old };
                    storage.replace_graph("g", model).unwrap();
                }
            });

            for _ in 0..200 {
                check(&storage.load_graph("g").unwrap().unwrap());
                check(&storage.load_union().unwrap());
            }
        });
    }
}
