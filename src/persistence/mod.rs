//! Persistence layer
//!
//! The dataset of named graphs lives in a single RocksDB database; see
//! [`storage`] for the key layout.

pub mod storage;

pub use storage::{DatasetStorage, GraphMeta, StorageError, StorageResult};
