// * Page Fetcher
// * Fetches the target page and runs extraction, retrying a fixed number of
// * times with fixed backoff. After exhausting retries, degrades to a
// * URL-only record rather than failing the capture.

use crate::capture::{PageExtractor, PageRecord};
use crate::config::constants::{FETCH_MAX_RETRIES, FETCH_RETRY_DELAY_MS, PAGE_FETCH_TIMEOUT_MS};
use crate::network::errors::NetworkError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("tabflow/", env!("CARGO_PKG_VERSION"));

/// Retry/timeout policy for page capture.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub max_retries: usize,
    pub retry_delay_ms: u64,
    pub timeout_ms: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_retries: FETCH_MAX_RETRIES,
            retry_delay_ms: FETCH_RETRY_DELAY_MS,
            timeout_ms: PAGE_FETCH_TIMEOUT_MS,
        }
    }
}

/// HTTP client for capturing pages.
pub struct PageFetcher {
    inner: Client,
    config: FetcherConfig,
}

impl PageFetcher {
    pub fn new() -> Result<Self, NetworkError> {
        Self::with_config(FetcherConfig::default())
    }

    pub fn with_config(config: FetcherConfig) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            inner: client,
            config,
        })
    }

    /// Captures a page as a [`PageRecord`]. Never fails: after the retry
    /// budget is spent, returns the minimal URL-only record.
    pub async fn capture(&self, url: &str) -> PageRecord {
        if Url::parse(url).is_err() {
            tracing::warn!(url, "unparseable URL, capturing minimal record");
            return PageRecord::minimal(url);
        }

        let attempts = self.config.max_retries + 1;
        for attempt in 1..=attempts {
            match self.fetch_html(url).await {
                Ok(html) => {
                    tracing::debug!(url, attempt, bytes = html.len(), "page fetched");
                    return PageExtractor::extract(url, &html);
                }
                Err(e) => {
                    tracing::warn!(url, attempt, error = %e, "page fetch failed");
                    if attempt < attempts {
                        tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms))
                            .await;
                    }
                }
            }
        }

        tracing::warn!(url, "capture exhausted retries, falling back to URL-level metadata");
        PageRecord::minimal(url)
    }

    /// Single fetch attempt, validating the URL and the response status.
    pub async fn fetch_html(&self, url: &str) -> Result<String, NetworkError> {
        let parsed = Url::parse(url).map_err(|e| NetworkError::InvalidUrl(e.to_string()))?;
        let resp = self.inner.get(parsed).send().await?;
        let status = resp.status();

        if !status.is_success() {
            return Err(NetworkError::Status(status.as_u16()));
        }

        Ok(resp.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_config() -> FetcherConfig {
        FetcherConfig {
            max_retries: 3,
            retry_delay_ms: 10,
            timeout_ms: 5_000,
        }
    }

    #[tokio::test]
    async fn test_capture_extracts_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><head><title>Hello</title></head><body><p>body</p></body></html>"#,
            ))
            .mount(&server)
            .await;

        let fetcher = PageFetcher::with_config(fast_config()).unwrap();
        let record = fetcher.capture(&format!("{}/page", server.uri())).await;

        assert_eq!(record.title, "Hello");
    }

    #[tokio::test]
    async fn test_capture_retries_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><head><title>Recovered</title></head></html>"),
            )
            .mount(&server)
            .await;

        let fetcher = PageFetcher::with_config(fast_config()).unwrap();
        let record = fetcher.capture(&format!("{}/flaky", server.uri())).await;

        assert_eq!(record.title, "Recovered");
    }

    #[tokio::test]
    async fn test_fetch_html_rejects_unparseable_url() {
        let fetcher = PageFetcher::with_config(fast_config()).unwrap();
        let err = fetcher.fetch_html("not a url").await.unwrap_err();
        assert!(matches!(err, NetworkError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_capture_falls_back_to_minimal_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            // * Initial attempt + 3 retries
            .expect(4)
            .mount(&server)
            .await;

        let fetcher = PageFetcher::with_config(fast_config()).unwrap();
        let url = format!("{}/down", server.uri());
        let record = fetcher.capture(&url).await;

        assert_eq!(record.url, url);
        assert!(record.description.is_empty());
        assert!(record.has_required_fields());
    }
}
