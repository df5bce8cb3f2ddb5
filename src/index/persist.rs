//! Index persistence: four artifacts per index directory
//!
//! Three binary maps (`bincode`) and one human-readable JSON statistics
//! file. The artifact set is all-or-nothing: the index counts as existing
//! only when all four files are present, so a partially written index is
//! rebuilt rather than half-loaded.

use crate::index::snapshot::{IndexSnapshot, IndexStats};
use crate::index::IndexError;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Locations of the persisted index artifacts
pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn inverted_index(&self) -> PathBuf {
        self.root.join("inverted_index.bin")
    }

    fn doc_metadata(&self) -> PathBuf {
        self.root.join("doc_metadata.bin")
    }

    fn term_doc_freq(&self) -> PathBuf {
        self.root.join("term_doc_freq.bin")
    }

    fn stats(&self) -> PathBuf {
        self.root.join("index_stats.json")
    }

    /// True only if every artifact is present
    pub fn all_exist(&self) -> bool {
        self.inverted_index().exists()
            && self.doc_metadata().exists()
            && self.term_doc_freq().exists()
            && self.stats().exists()
    }
}

/// Persists a snapshot as the four on-disk artifacts
pub fn save(paths: &IndexPaths, snapshot: &IndexSnapshot) -> Result<(), IndexError> {
    std::fs::create_dir_all(&paths.root)?;

    bincode::serialize_into(
        File::create(paths.inverted_index())?,
        &snapshot.inverted_index,
    )?;
    bincode::serialize_into(File::create(paths.doc_metadata())?, &snapshot.doc_metadata)?;
    bincode::serialize_into(File::create(paths.term_doc_freq())?, &snapshot.term_doc_freq)?;

    let stats_json = serde_json::to_string_pretty(&snapshot.stats())?;
    std::fs::write(paths.stats(), stats_json)?;

    tracing::info!("Index saved to {}", paths.root.display());
    Ok(())
}

/// Loads a snapshot back from disk
///
/// Document count, lengths, and the indexed field list come from the stats
/// artifact, mirroring what was written at save time.
pub fn load(paths: &IndexPaths) -> Result<IndexSnapshot, IndexError> {
    let inverted_index = bincode::deserialize_from(File::open(paths.inverted_index())?)?;
    let doc_metadata = bincode::deserialize_from(File::open(paths.doc_metadata())?)?;
    let term_doc_freq = bincode::deserialize_from(File::open(paths.term_doc_freq())?)?;

    let stats: IndexStats = serde_json::from_str(&std::fs::read_to_string(paths.stats())?)?;

    let snapshot = IndexSnapshot {
        inverted_index,
        doc_metadata,
        term_doc_freq,
        doc_lengths: stats.doc_lengths,
        total_docs: stats.total_docs,
        indexed_fields: stats.indexed_fields,
    };

    tracing::info!(
        "Index loaded: {} documents, {} unique terms",
        snapshot.total_docs,
        snapshot.vocabulary_size()
    );
    Ok(snapshot)
}
