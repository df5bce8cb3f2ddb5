//! Link discovery from fetched pages
//!
//! Pulls `href` values out of anchor tags, resolves them against the page
//! URL, and strips fragments. Eligibility (same origin, robots rules, dedup)
//! is the frontier's job, so this stays a pure extraction step.

use crate::url::without_fragment;
use scraper::{Html, Selector};
use url::Url;

/// Extracts absolute, fragment-free link targets from a page body
pub fn discover_links(page_url: &Url, body: &str) -> Vec<Url> {
    let document = Html::parse_document(body);
    let mut links = Vec::new();

    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return links,
    };

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        // Fragment-only and non-navigational targets
        if href.starts_with('#')
            || href.starts_with("javascript:")
            || href.starts_with("mailto:")
            || href.starts_with("tel:")
            || href.starts_with("data:")
        {
            continue;
        }

        match page_url.join(href) {
            Ok(resolved) => {
                if matches!(resolved.scheme(), "http" | "https") {
                    links.push(without_fragment(&resolved));
                }
            }
            Err(e) => {
                tracing::debug!("Ignoring unresolvable href '{}': {}", href, e);
            }
        }
    }

    links
}
