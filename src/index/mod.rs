//! Inverted index module
//!
//! Consumes the extractor's structured records and produces a persistent
//! [`IndexSnapshot`]: an inverted index with per-document statistics and
//! TF-IDF scoring under two interchangeable IDF formulas.

mod builder;
mod persist;
mod snapshot;
mod tokenizer;

pub use builder::{build, read_records};
pub use persist::{load, save, IndexPaths};
pub use snapshot::{DocId, IdfMethod, IndexSnapshot, IndexStats, StructuredRecord};
pub use tokenizer::tokenize;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Index-specific errors
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Data file not found: {}", .0.display())]
    DataNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Encode(#[from] bincode::Error),

    #[error("Stats file error: {0}")]
    Stats(#[from] serde_json::Error),
}

/// Orchestrates index build, persistence, and reload
pub struct Indexer {
    records_path: PathBuf,
    paths: IndexPaths,
    indexable_fields: Vec<String>,
}

impl Indexer {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(
        records_path: P,
        index_dir: Q,
        indexable_fields: Vec<String>,
    ) -> Self {
        Self {
            records_path: records_path.as_ref().to_path_buf(),
            paths: IndexPaths::new(index_dir),
            indexable_fields,
        }
    }

    /// True only if all four persisted artifacts are present
    pub fn index_exists(&self) -> bool {
        self.paths.all_exist()
    }

    /// Loads the persisted index, or (re)builds and persists it
    ///
    /// Existing artifacts are loaded verbatim unless `force_rebuild` is set
    /// or any artifact is missing. A rebuild reads the records CSV (missing
    /// file is fatal) and replaces the artifact set as a whole.
    pub fn run(&self, force_rebuild: bool) -> Result<IndexSnapshot, IndexError> {
        if self.index_exists() && !force_rebuild {
            tracing::info!("Index artifacts found, loading existing index");
            return load(&self.paths);
        }

        if force_rebuild {
            tracing::info!("Force rebuild requested, building new index");
        } else {
            tracing::info!("No complete index found, building new index");
        }

        let records = read_records(&self.records_path)?;
        tracing::info!(
            "Building index from {} ({} records)",
            self.records_path.display(),
            records.len()
        );

        let snapshot = build(&records, &self.indexable_fields);
        save(&self.paths, &snapshot)?;
        Ok(snapshot)
    }
}
