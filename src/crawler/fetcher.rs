//! HTTP fetcher implementation
//!
//! One rate-limited GET per call: every fetch sleeps a jittered politeness
//! delay before the request goes out. Transport errors and non-2xx statuses
//! are returned as errors and never retried within a run.

use crate::config::UserAgentConfig;
use crate::QuarryError;
use rand::Rng;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// A successfully fetched page
#[derive(Debug)]
pub struct FetchedPage {
    /// HTTP status code
    pub status: u16,

    /// Page body content
    pub body: String,
}

/// Builds the HTTP client used for the whole crawl session
///
/// The user agent identifies the crawler and its operator:
/// `Name/Version (+ContactURL; ContactEmail)`.
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL after a jittered politeness sleep
///
/// Sleeps an integer number of seconds drawn uniformly from
/// `[delay_secs, delay_secs + jitter_secs]`, then issues a GET with the
/// client's bounded timeout.
///
/// # Errors
///
/// * `QuarryError::Http` - transport failure (timeout, connection error)
/// * `QuarryError::Status` - the server answered with a non-2xx status
pub async fn fetch_page(
    client: &Client,
    url: &Url,
    delay_secs: u64,
    jitter_secs: u64,
) -> Result<FetchedPage, QuarryError> {
    let delay = rand::thread_rng().gen_range(delay_secs..=delay_secs + jitter_secs);
    if delay > 0 {
        tracing::debug!("Sleeping {}s before fetching {}", delay, url);
        tokio::time::sleep(Duration::from_secs(delay)).await;
    }

    tracing::info!("Downloading page: {} [delay: {}s]", url, delay);

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| QuarryError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(QuarryError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|source| QuarryError::Http {
        url: url.to_string(),
        source,
    })?;

    Ok(FetchedPage {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "quarry-test".to_string(),
            crawler_version: "0.1".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&create_test_config());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        let client = build_http_client(&create_test_config()).unwrap();
        let url = Url::parse(&format!("{}/page", server.uri())).unwrap();

        let page = fetch_page(&client, &url, 0, 0).await.unwrap();
        assert_eq!(page.status, 200);
        assert_eq!(page.body, "hello");
    }

    #[tokio::test]
    async fn test_fetch_non_2xx_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_http_client(&create_test_config()).unwrap();
        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();

        let err = fetch_page(&client, &url, 0, 0).await.unwrap_err();
        assert!(matches!(err, QuarryError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_connection_error() {
        let client = build_http_client(&create_test_config()).unwrap();
        // Port 1 is essentially never listening
        let url = Url::parse("http://127.0.0.1:1/").unwrap();

        let err = fetch_page(&client, &url, 0, 0).await.unwrap_err();
        assert!(matches!(err, QuarryError::Http { .. }));
    }
}
