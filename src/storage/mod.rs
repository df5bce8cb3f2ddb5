//! Storage module for persisting crawl output
//!
//! This module owns the on-disk layout of a crawl session:
//! - `html_output/` with raw page bodies mirrored from URL paths
//! - `download_log.csv`, the append-only record of successful fetches,
//!   which doubles as the durable visited history consulted on resume
//! - directory setup for a session (failures here are fatal)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// File name of the append-only download log under the data directory
pub const DOWNLOAD_LOG_FILE: &str = "download_log.csv";

/// File name of the frontier checkpoint under the data directory
pub const DOWNLOAD_QUEUE_FILE: &str = "download_queue.txt";

/// Directory name for saved page bodies under the data directory
pub const HTML_DIR: &str = "html_output";

/// Storage-specific errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One row of the download log, written per successful fetch in fetch order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRecord {
    pub url: String,
    pub downloaded_at: DateTime<Utc>,
    pub filesize_bytes: u64,
    pub filepath_saved: String,
}

/// Creates the data directory and its `html_output/` subdirectory
///
/// Returns the path to the HTML output directory. Failures are fatal to the
/// caller; no partial session state is left ambiguous.
pub fn setup_data_dir(data_dir: &Path) -> Result<PathBuf, StorageError> {
    std::fs::create_dir_all(data_dir)?;
    let html_dir = data_dir.join(HTML_DIR);
    std::fs::create_dir_all(&html_dir)?;
    Ok(html_dir)
}

/// Maps a URL's path component to a relative file path under the HTML dir
///
/// Empty and trailing-slash paths get an `index.html` leaf so every fetched
/// page lands in a real file.
pub fn page_relative_path(url: &Url) -> String {
    let mut relative = url.path().trim_start_matches('/').to_string();
    if relative.is_empty() || relative.ends_with('/') {
        relative.push_str("index.html");
    }
    relative
}

/// Writes a page body verbatim under the HTML directory
///
/// Creates intermediate directories as needed. Returns the relative path the
/// page was saved to and its size in bytes.
pub fn save_page(html_dir: &Path, url: &Url, body: &str) -> Result<(String, u64), StorageError> {
    let relative = page_relative_path(url);
    let full_path = html_dir.join(&relative);

    if let Some(parent) = full_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(&full_path, body)?;
    Ok((relative, body.len() as u64))
}

/// Append-only CSV log of successful downloads
///
/// Header row `url,downloaded_at,filesize_bytes,filepath_saved` is written
/// exactly once, when the file is first created. Rows are never mutated or
/// deleted. The external extractor and the frontier's resume logic both read
/// this file.
pub struct DownloadLog {
    path: PathBuf,
}

impl DownloadLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the log file with its header row if it does not exist yet
    pub fn ensure_header(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(["url", "downloaded_at", "filesize_bytes", "filepath_saved"])?;
        writer.flush()?;
        Ok(())
    }

    /// Appends one record to the log
    pub fn append(&self, record: &DownloadRecord) -> Result<(), StorageError> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads back the set of URLs already downloaded in previous sessions
    ///
    /// A missing log means a fresh start: the set is empty.
    pub fn visited_urls(&self) -> Result<HashSet<String>, StorageError> {
        let mut visited = HashSet::new();
        if !self.path.exists() {
            return Ok(visited);
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        for result in reader.records() {
            let record = result?;
            if let Some(url) = record.get(0) {
                visited.insert(url.to_string());
            }
        }
        Ok(visited)
    }
}
