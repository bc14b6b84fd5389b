//! Import of RDF files into named graphs
//!
//! Each file becomes one graph named after the file's base name. A directory
//! imports its direct children independently: a failure on one file is logged
//! and recorded in the report, and the remaining files are still imported.

use super::{AddOutcome, RepositoryError, RepositoryResult, ServiceRepository};
use crate::rdf::{RdfFormat, RdfParser};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Outcome of importing one directory entry
#[derive(Debug)]
pub struct ImportEntry {
    /// File that was imported
    pub path: PathBuf,
    /// Graph name derived from the file name
    pub graph: String,
    /// What happened
    pub outcome: Result<AddOutcome, RepositoryError>,
}

/// Per-file results of [`ServiceRepository::import_model`]
#[derive(Debug)]
pub struct ImportReport {
    /// Path passed to the import
    pub root: PathBuf,
    /// Format every entry was parsed as
    pub format: RdfFormat,
    /// One entry per file, in import order
    pub entries: Vec<ImportEntry>,
}

impl ImportReport {
    /// Entries that were stored
    pub fn imported(&self) -> impl Iterator<Item = &AddOutcome> {
        self.entries.iter().filter_map(|e| e.outcome.as_ref().ok())
    }

    /// Entries that failed, with their cause
    pub fn failed(&self) -> impl Iterator<Item = (&Path, &RepositoryError)> {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.as_ref().err().map(|err| (e.path.as_path(), err)))
    }

    /// Graph names whose previous contents were overwritten
    pub fn overwritten(&self) -> Vec<&str> {
        self.imported()
            .filter(|outcome| outcome.replaced.is_some())
            .map(|outcome| outcome.name.as_str())
            .collect()
    }

    /// True when every entry was imported
    pub fn is_success(&self) -> bool {
        self.entries.iter().all(|e| e.outcome.is_ok())
    }
}

impl ServiceRepository {
    /// Import a file, or every direct child of a directory, as named graphs
    ///
    /// `lang` is a format label (`RDF/XML`, `RDF/XML-ABBREV`, `N-TRIPLE`,
    /// `TURTLE`, `TTL`, `N3`); `None` means RDF/XML. Sub-directories are not
    /// descended into and are reported as unsupported entries.
    pub fn import_model(&self, path: impl AsRef<Path>, lang: Option<&str>) -> RepositoryResult<ImportReport> {
        let path = path.as_ref();
        if !path.exists() {
            error!("Cannot find the file/dir at {}", path.display());
            return Err(RepositoryError::PathNotFound(path.to_path_buf()));
        }

        let format = RdfFormat::from_label(lang)?;

        let entries = if path.is_dir() {
            let children = std::fs::read_dir(path)?.map(|entry| entry.map(|e| e.path()));
            self.import_children(path, children, format)
        } else {
            vec![self.import_entry(path.to_path_buf(), format)]
        };

        let report = ImportReport {
            root: path.to_path_buf(),
            format,
            entries,
        };

        info!(
            "Imported {} of {} file(s) from {}",
            report.imported().count(),
            report.entries.len(),
            path.display()
        );

        Ok(report)
    }

    /// Import directory children in path order
    ///
    /// An entry that cannot be listed is recorded as a failure against `dir`
    /// and the remaining children are still imported.
    fn import_children(
        &self,
        dir: &Path,
        children: impl IntoIterator<Item = io::Result<PathBuf>>,
        format: RdfFormat,
    ) -> Vec<ImportEntry> {
        let mut entries = Vec::new();
        let mut paths = Vec::new();

        for child in children {
            match child {
                Ok(path) => paths.push(path),
                Err(e) => {
                    error!("Error listing an entry of {}: {}", dir.display(), e);
                    entries.push(ImportEntry {
                        path: dir.to_path_buf(),
                        graph: String::new(),
                        outcome: Err(e.into()),
                    });
                }
            }
        }

        paths.sort();
        entries.extend(paths.into_iter().map(|path| self.import_entry(path, format)));
        entries
    }

    fn import_entry(&self, path: PathBuf, format: RdfFormat) -> ImportEntry {
        let graph = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let outcome = if path.is_file() {
            self.import_file(&path, &graph, format)
        } else {
            warn!("Skipping {}: not a regular file", path.display());
            Err(RepositoryError::UnsupportedEntry(path.clone()))
        };

        ImportEntry { path, graph, outcome }
    }

    fn import_file(&self, path: &Path, graph: &str, format: RdfFormat) -> RepositoryResult<AddOutcome> {
        let result = RdfParser::parse_file(path, format)
            .map_err(RepositoryError::from)
            .and_then(|model| self.add_model(&model, Some(graph)));

        match &result {
            Ok(outcome) => {
                info!("The model {} successfully imported to repository", path.display());
                if outcome.replaced.is_some() {
                    warn!("Import of {} overwrote existing model {}", path.display(), graph);
                }
            }
            Err(e) => error!("Error reading the model file {}: {}", path.display(), e),
        }

        result
    }
}
