//! Robots.txt handling module
//!
//! Fetches the domain's robots.txt once per crawl session, caches the raw
//! text on disk, and derives a [`PolitenessPolicy`] from the default
//! user-agent block. The cached text is re-parsed each session so a stricter
//! parser can replace the scan without touching the frontier.

mod parser;

pub use parser::{parse_policy, PolitenessPolicy};

use crate::crawler::fetch_page;
use reqwest::Client;
use std::path::Path;
use url::Url;

/// File name for the cached raw robots.txt under the data directory
pub const ROBOTS_CACHE_FILE: &str = "robots.txt";

/// Resolves the politeness policy for the seed's origin
///
/// Uses the raw robots.txt cached under `data_dir` when present; otherwise
/// fetches `<origin>/robots.txt` with the default (pre-policy) pacing and
/// caches the body. Fetch or cache-write failures fail open: the crawl
/// proceeds with an empty disallow list and the default delay.
pub async fn resolve(
    client: &Client,
    seed: &Url,
    data_dir: &Path,
    default_delay_secs: u64,
    jitter_secs: u64,
) -> PolitenessPolicy {
    let cache_path = data_dir.join(ROBOTS_CACHE_FILE);

    let text = if cache_path.exists() {
        match std::fs::read_to_string(&cache_path) {
            Ok(text) => {
                tracing::debug!("Using cached robots.txt from {}", cache_path.display());
                Some(text)
            }
            Err(e) => {
                tracing::warn!("Failed to read cached robots.txt: {}", e);
                None
            }
        }
    } else {
        let mut robots_url = seed.clone();
        robots_url.set_path("/robots.txt");
        robots_url.set_query(None);
        robots_url.set_fragment(None);

        match fetch_page(client, &robots_url, default_delay_secs, jitter_secs).await {
            Ok(page) => {
                if let Err(e) = std::fs::write(&cache_path, &page.body) {
                    tracing::warn!("Failed to cache robots.txt: {}", e);
                }
                Some(page.body)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch robots.txt, allowing all: {}", e);
                None
            }
        }
    };

    match text {
        Some(text) => {
            let policy = parse_policy(&text, default_delay_secs);
            tracing::info!(
                "Politeness policy: delay {}s, {} disallowed prefixes",
                policy.crawl_delay_secs,
                policy.disallowed_prefixes.len()
            );
            policy
        }
        None => PolitenessPolicy::allow_all(default_delay_secs),
    }
}
