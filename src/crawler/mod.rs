//! Crawler module for polite, resumable single-domain crawling
//!
//! This module contains the crawl-phase machinery:
//! - The deduplicated, checkpointed frontier queue
//! - Rate-limited HTTP fetching with politeness jitter
//! - Link discovery feeding back into the frontier
//! - Session coordination and resume

mod coordinator;
mod discover;
mod fetcher;
mod frontier;

pub use coordinator::{crawl, Coordinator, CrawlSummary};
pub use discover::discover_links;
pub use fetcher::{build_http_client, fetch_page, FetchedPage};
pub use frontier::Frontier;
