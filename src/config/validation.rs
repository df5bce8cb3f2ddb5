use crate::config::types::{Config, CrawlConfig, IndexConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_index_config(&config.index)?;
    Ok(())
}

/// Validates crawl session configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    let seed = Url::parse(&config.seed_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed-url: {}", e)))?;

    if !matches!(seed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(format!(
            "seed-url must be http or https, got '{}'",
            seed.scheme()
        )));
    }

    if seed.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(
            "seed-url has no host".to_string(),
        ));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.data_dir.is_empty() {
        return Err(ConfigError::Validation(
            "data-dir cannot be empty".to_string(),
        ));
    }

    if config.records_path.is_empty() {
        return Err(ConfigError::Validation(
            "records-path cannot be empty".to_string(),
        ));
    }

    if config.index_dir.is_empty() {
        return Err(ConfigError::Validation(
            "index-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates index configuration
fn validate_index_config(config: &IndexConfig) -> Result<(), ConfigError> {
    if config.fields.is_empty() {
        return Err(ConfigError::Validation(
            "index fields cannot be empty".to_string(),
        ));
    }

    if config.fields.iter().any(|f| f.is_empty()) {
        return Err(ConfigError::Validation(
            "index fields cannot contain empty names".to_string(),
        ));
    }

    Ok(())
}

/// Basic email shape check: one '@' with non-empty local part and a dotted domain
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "contact-email does not look like an email address: '{}'",
            email
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> Config {
        Config {
            crawl: CrawlConfig {
                seed_url: "https://example.com/".to_string(),
                max_pages: 10,
                request_delay_secs: 1,
                request_jitter_secs: 5,
            },
            user_agent: UserAgentConfig {
                crawler_name: "quarry".to_string(),
                crawler_version: "0.1".to_string(),
                contact_url: "https://example.com/about".to_string(),
                contact_email: "admin@example.com".to_string(),
            },
            output: OutputConfig {
                data_dir: "./data".to_string(),
                records_path: "./data/extracted_data.csv".to_string(),
                index_dir: "./data/index".to_string(),
            },
            index: IndexConfig::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&create_test_config()).is_ok());
    }

    #[test]
    fn test_invalid_seed_url() {
        let mut config = create_test_config();
        config.crawl.seed_url = "not a url".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_non_http_seed_url() {
        let mut config = create_test_config();
        config.crawl.seed_url = "ftp://example.com/".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::InvalidUrl(_)
        ));
    }

    #[test]
    fn test_zero_max_pages() {
        let mut config = create_test_config();
        config.crawl.max_pages = 0;
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::Validation(_)
        ));
    }

    #[test]
    fn test_empty_crawler_name() {
        let mut config = create_test_config();
        config.user_agent.crawler_name = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_crawler_name_with_spaces() {
        let mut config = create_test_config();
        config.user_agent.crawler_name = "bad name".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bad_email() {
        let mut config = create_test_config();
        config.user_agent.contact_email = "not-an-email".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_data_dir() {
        let mut config = create_test_config();
        config.output.data_dir = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_index_fields() {
        let mut config = create_test_config();
        config.index.fields.clear();
        assert!(validate(&config).is_err());
    }
}
