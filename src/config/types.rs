use serde::Deserialize;

/// Main configuration structure for quarry
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawl: CrawlConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub index: IndexConfig,
}

/// Crawl session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Seed URL; the crawl never leaves this URL's scheme+host
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Maximum number of pages to fetch in one session
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Default delay between requests in seconds, before robots.txt
    /// supplies a Crawl-delay
    #[serde(rename = "request-delay-secs", default = "default_request_delay")]
    pub request_delay_secs: u64,

    /// Upper jitter bound added to the delay; each fetch sleeps a uniform
    /// number of seconds in [delay, delay + jitter]
    #[serde(rename = "request-jitter-secs", default = "default_request_jitter")]
    pub request_jitter_secs: u64,
}

fn default_request_delay() -> u64 {
    15
}

fn default_request_jitter() -> u64 {
    5
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output locations for crawl and index artifacts
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root directory for crawl output: html_output/, download_log.csv,
    /// download_queue.txt, robots.txt
    #[serde(rename = "data-dir")]
    pub data_dir: String,

    /// CSV of structured records produced by the external extractor,
    /// consumed by the indexer
    #[serde(rename = "records-path")]
    pub records_path: String,

    /// Directory holding the four persisted index artifacts
    #[serde(rename = "index-dir")]
    pub index_dir: String,
}

/// Index build configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    /// Record fields whose text is tokenized into the index
    #[serde(default = "default_index_fields")]
    pub fields: Vec<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            fields: default_index_fields(),
        }
    }
}

fn default_index_fields() -> Vec<String> {
    ["name", "full_name", "description", "contry", "type", "status"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_header_value() {
        let ua = UserAgentConfig {
            crawler_name: "quarry".to_string(),
            crawler_version: "0.1".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        };
        assert_eq!(
            ua.header_value(),
            "quarry/0.1 (+https://example.com/about; admin@example.com)"
        );
    }

    #[test]
    fn test_default_index_fields() {
        let index = IndexConfig::default();
        assert_eq!(index.fields.len(), 6);
        assert!(index.fields.contains(&"description".to_string()));
    }
}
