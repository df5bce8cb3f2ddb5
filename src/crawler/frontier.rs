//! Crawl frontier: the deduplicated, checkpointed URL queue
//!
//! The frontier is the single place where URL eligibility is decided. Both
//! the crawl loop and the link discoverer go through [`Frontier::enqueue`]
//! and [`Frontier::dequeue`], so the origin check, the robots.txt disallow
//! check, and the visited/queued dedup cannot diverge between call sites.
//!
//! Insertion order is priority: the queue is FIFO. After every processed URL
//! the queue is rewritten to the checkpoint file, one URL per line, so an
//! interrupted run loses at most the single in-flight URL.

use crate::robots::PolitenessPolicy;
use crate::storage::StorageError;
use crate::url::same_origin;
use std::collections::{HashSet, VecDeque};
use std::io::Write;
use std::path::PathBuf;
use url::Url;

/// Deduplicated FIFO queue of URLs plus the session's visited-set
pub struct Frontier {
    queue: VecDeque<Url>,
    /// String mirror of `queue` for O(1) membership checks
    queued: HashSet<String>,
    /// Every URL processed this session or logged in a previous one,
    /// whether it succeeded, failed, or was skipped
    visited: HashSet<String>,
    policy: PolitenessPolicy,
    seed: Url,
    checkpoint_path: PathBuf,
}

impl Frontier {
    /// Creates a frontier for one crawl session
    ///
    /// Restores the persisted queue file if present, dropping entries that
    /// appear in `visited_history` (the download log) or that the current
    /// policy disallows. Seeds the queue with the seed URL when the restored
    /// queue comes up empty.
    pub fn new(
        seed: Url,
        policy: PolitenessPolicy,
        checkpoint_path: PathBuf,
        visited_history: HashSet<String>,
    ) -> Result<Self, StorageError> {
        let mut frontier = Self {
            queue: VecDeque::new(),
            queued: HashSet::new(),
            visited: visited_history,
            policy,
            seed,
            checkpoint_path,
        };

        if frontier.checkpoint_path.exists() {
            let content = std::fs::read_to_string(&frontier.checkpoint_path)?;
            for line in content.lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match Url::parse(line) {
                    Ok(url) => {
                        frontier.enqueue(&url);
                    }
                    Err(e) => {
                        tracing::warn!("Skipping malformed checkpoint entry '{}': {}", line, e);
                    }
                }
            }
            tracing::info!(
                "Restored {} URLs from checkpoint {}",
                frontier.queue.len(),
                frontier.checkpoint_path.display()
            );
        }

        if frontier.queue.is_empty() {
            let seed = frontier.seed.clone();
            frontier.queued.insert(seed.as_str().to_string());
            frontier.queue.push_back(seed);
        }

        Ok(frontier)
    }

    /// Returns true if the URL may join the queue: same origin as the seed,
    /// not disallowed by robots.txt, and neither visited nor already queued
    pub fn is_eligible(&self, url: &Url) -> bool {
        same_origin(&self.seed, url)
            && !self.policy.is_disallowed(url.path())
            && !self.visited.contains(url.as_str())
            && !self.queued.contains(url.as_str())
    }

    /// Adds a URL to the back of the queue if it is eligible
    ///
    /// Returns true if the URL was added.
    pub fn enqueue(&mut self, url: &Url) -> bool {
        if !self.is_eligible(url) {
            return false;
        }
        self.queued.insert(url.as_str().to_string());
        self.queue.push_back(url.clone());
        true
    }

    /// Pops the oldest eligible URL
    ///
    /// Entries that were visited since being queued, or whose path the
    /// policy now disallows, are discarded (marked visited, never yielded)
    /// and the next entry is tried.
    pub fn dequeue(&mut self) -> Option<Url> {
        while let Some(url) = self.queue.pop_front() {
            self.queued.remove(url.as_str());

            if self.visited.contains(url.as_str()) {
                tracing::debug!("Skipping already visited URL: {}", url);
                continue;
            }

            if self.policy.is_disallowed(url.path()) {
                tracing::info!("Skipping URL '{}' (disallowed by robots.txt)", url);
                self.visited.insert(url.as_str().to_string());
                continue;
            }

            return Some(url);
        }
        None
    }

    /// Marks a URL as processed for this session, success or failure
    pub fn mark_visited(&mut self, url: &Url) {
        self.visited.insert(url.as_str().to_string());
    }

    /// Overwrites the checkpoint file with the current queue, one URL per line
    pub fn checkpoint(&self) -> Result<(), StorageError> {
        let mut file = std::fs::File::create(&self.checkpoint_path)?;
        for url in &self.queue {
            writeln!(file, "{}", url)?;
        }
        Ok(())
    }

    /// Number of URLs waiting in the queue
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of URLs known to be visited, including restored history
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// The session's politeness policy
    pub fn policy(&self) -> &PolitenessPolicy {
        &self.policy
    }

    /// Bypasses eligibility checks; dequeue must still filter such entries
    #[cfg(test)]
    pub(crate) fn force_enqueue(&mut self, url: Url) {
        self.queued.insert(url.as_str().to_string());
        self.queue.push_back(url);
    }
}
