//! Best-effort robots.txt scan
//!
//! Only the default user-agent block is interpreted, and within it only the
//! `Disallow` and `Crawl-delay` directives. Wildcards, `Allow` overrides,
//! and blocks for named agents are not interpreted. The scan fails open:
//! when no `User-agent: *` block exists the policy allows everything and
//! keeps the configured default delay.

/// Politeness rules derived from robots.txt at session start
///
/// Immutable once built; one instance governs a whole crawl session.
#[derive(Debug, Clone, PartialEq)]
pub struct PolitenessPolicy {
    /// Seconds to wait before each request (before jitter)
    pub crawl_delay_secs: u64,

    /// Path prefixes the crawler must not fetch, in encountered order,
    /// compared via literal prefix match
    pub disallowed_prefixes: Vec<String>,
}

impl PolitenessPolicy {
    /// A permissive policy: no disallowed paths, the given default delay
    pub fn allow_all(default_delay_secs: u64) -> Self {
        Self {
            crawl_delay_secs: default_delay_secs,
            disallowed_prefixes: Vec::new(),
        }
    }

    /// Returns true if the path starts with any disallowed prefix
    pub fn is_disallowed(&self, path: &str) -> bool {
        self.disallowed_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

/// Scans robots.txt text for the `User-agent: *` block and builds a policy
///
/// The block starts after a line whose trimmed content is exactly
/// `User-agent: *` (case-sensitive) and ends at the next `User-agent:` line,
/// a comment marker, or a blank line. Every `Disallow` value is collected in
/// order, duplicates and empty values included. The last `Crawl-delay` value
/// that parses as a non-negative number overrides the default delay;
/// unparsable values are ignored individually.
pub fn parse_policy(text: &str, default_delay_secs: u64) -> PolitenessPolicy {
    let mut policy = PolitenessPolicy::allow_all(default_delay_secs);

    let mut in_block = false;
    let mut found_block = false;

    for line in text.lines() {
        let trimmed = line.trim();

        if !in_block {
            if trimmed == "User-agent: *" {
                in_block = true;
                found_block = true;
            }
            continue;
        }

        // Block terminators: next agent block, comment, or blank line
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("User-agent:") {
            break;
        }

        if let Some(value) = trimmed.strip_prefix("Disallow:") {
            policy.disallowed_prefixes.push(value.trim().to_string());
        } else if let Some(value) = trimmed.strip_prefix("Crawl-delay:") {
            if let Ok(delay) = value.trim().parse::<f64>() {
                if delay >= 0.0 {
                    policy.crawl_delay_secs = delay as u64;
                }
            }
        }
    }

    if !found_block {
        tracing::debug!("No 'User-agent: *' block found in robots.txt, allowing all");
    }

    policy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_all() {
        let policy = PolitenessPolicy::allow_all(15);
        assert_eq!(policy.crawl_delay_secs, 15);
        assert!(!policy.is_disallowed("/any/path"));
    }

    #[test]
    fn test_parse_disallow_and_delay() {
        let text = "User-agent: *\nDisallow: /api/\nCrawl-delay: 10\nDisallow: /admin/";
        let policy = parse_policy(text, 15);

        assert_eq!(policy.crawl_delay_secs, 10);
        assert_eq!(policy.disallowed_prefixes, vec!["/api/", "/admin/"]);
        assert!(policy.is_disallowed("/api/foo"));
        assert!(policy.is_disallowed("/admin/users"));
        assert!(!policy.is_disallowed("/page"));
    }

    #[test]
    fn test_no_star_block_fails_open() {
        let text = "User-agent: BadBot\nDisallow: /";
        let policy = parse_policy(text, 15);

        assert_eq!(policy.crawl_delay_secs, 15);
        assert!(policy.disallowed_prefixes.is_empty());
    }

    #[test]
    fn test_block_ends_at_next_user_agent() {
        let text = "User-agent: *\nDisallow: /a\nUser-agent: BadBot\nDisallow: /b";
        let policy = parse_policy(text, 15);
        assert_eq!(policy.disallowed_prefixes, vec!["/a"]);
    }

    #[test]
    fn test_block_ends_at_blank_line() {
        let text = "User-agent: *\nDisallow: /a\n\nDisallow: /b";
        let policy = parse_policy(text, 15);
        assert_eq!(policy.disallowed_prefixes, vec!["/a"]);
    }

    #[test]
    fn test_block_ends_at_comment() {
        let text = "User-agent: *\nDisallow: /a\n# rules below are for others\nDisallow: /b";
        let policy = parse_policy(text, 15);
        assert_eq!(policy.disallowed_prefixes, vec!["/a"]);
    }

    #[test]
    fn test_user_agent_match_is_case_sensitive() {
        let text = "user-agent: *\nDisallow: /a";
        let policy = parse_policy(text, 15);
        assert!(policy.disallowed_prefixes.is_empty());
    }

    #[test]
    fn test_last_crawl_delay_wins() {
        let text = "User-agent: *\nCrawl-delay: 5\nCrawl-delay: 20";
        let policy = parse_policy(text, 15);
        assert_eq!(policy.crawl_delay_secs, 20);
    }

    #[test]
    fn test_unparsable_crawl_delay_ignored() {
        let text = "User-agent: *\nCrawl-delay: 5\nCrawl-delay: soon\nDisallow: /x";
        let policy = parse_policy(text, 15);

        // bad value keeps the previous one and does not abort the scan
        assert_eq!(policy.crawl_delay_secs, 5);
        assert_eq!(policy.disallowed_prefixes, vec!["/x"]);
    }

    #[test]
    fn test_negative_crawl_delay_ignored() {
        let text = "User-agent: *\nCrawl-delay: -3";
        let policy = parse_policy(text, 15);
        assert_eq!(policy.crawl_delay_secs, 15);
    }

    #[test]
    fn test_fractional_crawl_delay_truncates() {
        let text = "User-agent: *\nCrawl-delay: 2.7";
        let policy = parse_policy(text, 15);
        assert_eq!(policy.crawl_delay_secs, 2);
    }

    #[test]
    fn test_duplicate_and_empty_disallows_kept() {
        let text = "User-agent: *\nDisallow: /a\nDisallow: /a\nDisallow:";
        let policy = parse_policy(text, 15);
        assert_eq!(policy.disallowed_prefixes, vec!["/a", "/a", ""]);
    }

    #[test]
    fn test_empty_input() {
        let policy = parse_policy("", 15);
        assert_eq!(policy, PolitenessPolicy::allow_all(15));
    }
}
