//! Crawl coordinator - main crawl orchestration logic
//!
//! Wires the session together: directory setup, download log, robots.txt
//! resolution, frontier initialization (with resume), and the sequential
//! crawl loop. The loop is deliberately single-worker: one jittered fetch at
//! a time, a frontier checkpoint after every processed URL.

use crate::config::Config;
use crate::crawler::discover::discover_links;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::frontier::Frontier;
use crate::robots;
use crate::storage::{self, DownloadLog, DownloadRecord};
use crate::QuarryError;
use chrono::Utc;
use reqwest::Client;
use std::path::PathBuf;
use url::Url;

/// Outcome of one crawl session
#[derive(Debug)]
pub struct CrawlSummary {
    /// Pages fetched this session (successes only)
    pub pages_fetched: u32,

    /// URLs still waiting in the checkpointed queue
    pub frontier_remaining: usize,

    /// Distinct URLs known visited, including restored history
    pub visited_total: usize,
}

/// Owns all session state for one crawl
pub struct Coordinator {
    config: Config,
    seed: Url,
    client: Client,
    frontier: Frontier,
    log: DownloadLog,
    html_dir: PathBuf,
    delay_secs: u64,
}

impl Coordinator {
    /// Prepares a crawl session
    ///
    /// Directory or log-file creation failures are fatal and surfaced
    /// immediately. Robots resolution fails open. When `fresh` is set, the
    /// frontier checkpoint is discarded so the crawl restarts from the seed;
    /// the download log is kept either way, so already-fetched pages are
    /// never re-fetched.
    pub async fn new(config: Config, fresh: bool) -> Result<Self, QuarryError> {
        let seed = Url::parse(&config.crawl.seed_url)?;
        let data_dir = PathBuf::from(&config.output.data_dir);
        let html_dir = storage::setup_data_dir(&data_dir)?;

        let checkpoint_path = data_dir.join(storage::DOWNLOAD_QUEUE_FILE);
        if fresh && checkpoint_path.exists() {
            std::fs::remove_file(&checkpoint_path)?;
            tracing::info!("Discarded frontier checkpoint for a fresh crawl");
        }

        let log = DownloadLog::new(data_dir.join(storage::DOWNLOAD_LOG_FILE));
        log.ensure_header()?;

        let client = build_http_client(&config.user_agent)?;

        let policy = robots::resolve(
            &client,
            &seed,
            &data_dir,
            config.crawl.request_delay_secs,
            config.crawl.request_jitter_secs,
        )
        .await;
        let delay_secs = policy.crawl_delay_secs;

        let visited_history = log.visited_urls()?;
        let frontier = Frontier::new(seed.clone(), policy, checkpoint_path, visited_history)?;

        tracing::info!(
            "Crawler initialized. Queue size: {}, known visited: {}",
            frontier.len(),
            frontier.visited_count()
        );

        Ok(Self {
            config,
            seed,
            client,
            frontier,
            log,
            html_dir,
            delay_secs,
        })
    }

    /// Runs the crawl loop until the frontier drains or the page cap is hit
    ///
    /// A fetch failure is not fatal: the URL is marked visited and the loop
    /// moves on. Save and log failures are logged and skipped; the page
    /// still counts toward the cap so it is never retried.
    pub async fn run(&mut self) -> Result<CrawlSummary, QuarryError> {
        let max_pages = self.config.crawl.max_pages;
        let jitter = self.config.crawl.request_jitter_secs;
        let start = std::time::Instant::now();
        let mut pages_fetched = 0u32;

        tracing::info!(
            "Starting crawl of {} (max pages: {}, delay: {}s)",
            self.seed,
            max_pages,
            self.delay_secs
        );

        while pages_fetched < max_pages {
            let url = match self.frontier.dequeue() {
                Some(url) => url,
                None => {
                    tracing::info!("Frontier is empty, crawl complete");
                    break;
                }
            };

            match fetch_page(&self.client, &url, self.delay_secs, jitter).await {
                Ok(page) => {
                    pages_fetched += 1;
                    self.frontier.mark_visited(&url);

                    match storage::save_page(&self.html_dir, &url, &page.body) {
                        Ok((relative, size)) => {
                            let record = DownloadRecord {
                                url: url.to_string(),
                                downloaded_at: Utc::now(),
                                filesize_bytes: size,
                                filepath_saved: relative,
                            };
                            if let Err(e) = self.log.append(&record) {
                                tracing::warn!("Failed to log download for {}: {}", url, e);
                            }
                        }
                        Err(e) => {
                            tracing::warn!("Could not save page content for {}: {}", url, e);
                        }
                    }

                    for link in discover_links(&url, &page.body) {
                        self.frontier.enqueue(&link);
                    }
                }
                Err(e) => {
                    tracing::warn!("Could not download page {}: {}", url, e);
                    self.frontier.mark_visited(&url);
                }
            }

            if let Err(e) = self.frontier.checkpoint() {
                tracing::warn!("Failed to checkpoint frontier: {}", e);
            }

            if pages_fetched > 0 && pages_fetched % 10 == 0 {
                let rate = pages_fetched as f64 / start.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} pages fetched, {} in frontier, {:.2} pages/sec",
                    pages_fetched,
                    self.frontier.len(),
                    rate
                );
            }
        }

        let summary = CrawlSummary {
            pages_fetched,
            frontier_remaining: self.frontier.len(),
            visited_total: self.frontier.visited_count(),
        };

        tracing::info!(
            "Crawl finished: {} pages fetched in {:?}, {} URLs left in queue, {} visited",
            summary.pages_fetched,
            start.elapsed(),
            summary.frontier_remaining,
            summary.visited_total
        );

        Ok(summary)
    }
}

/// Runs a complete crawl session from a configuration
pub async fn crawl(config: Config, fresh: bool) -> Result<CrawlSummary, QuarryError> {
    let mut coordinator = Coordinator::new(config, fresh).await?;
    coordinator.run().await
}
