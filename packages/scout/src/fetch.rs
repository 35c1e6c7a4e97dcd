//! Page fetching with a bounded timeout and a fixed identifying header.
//!
//! A fetch failure is never fatal to a pipeline; orchestrators match on
//! the error and move on to the next candidate link.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{DEFAULT_FETCH_TIMEOUT, USER_AGENT};
use crate::error::{FetchError, FetchResult};

/// Fetches a URL's raw HTML.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Single GET, no retries. Returns the response body as text.
    async fn fetch(&self, url: &str) -> FetchResult<String>;
}

/// reqwest-backed fetcher.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    /// Create a fetcher with the default 8 s timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    /// Create a fetcher with a custom timeout (the calorie fallback
    /// uses a tighter one).
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                code: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| classify(url, e))
    }
}

fn classify(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_builder() {
        FetchError::InvalidUrl {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: Box::new(error),
        }
    }
}

/// Mock fetcher for tests: canned url → html, with scripted failures.
#[derive(Default)]
pub struct MockFetcher {
    pages: HashMap<String, String>,
    timeouts: HashSet<String>,
}

impl MockFetcher {
    /// Create an empty mock (every fetch is a 404).
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page body for a URL.
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    /// Make a URL time out.
    pub fn with_timeout(mut self, url: &str) -> Self {
        self.timeouts.insert(url.to_string());
        self
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        if self.timeouts.contains(url) {
            return Err(FetchError::Timeout {
                url: url.to_string(),
            });
        }
        match self.pages.get(url) {
            Some(html) => Ok(html.clone()),
            None => Err(FetchError::Status {
                url: url.to_string(),
                code: 404,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_fetcher_serves_pages_and_failures() {
        let fetcher = MockFetcher::new()
            .with_page("https://a.com", "<html>ok</html>")
            .with_timeout("https://slow.com");

        assert_eq!(
            fetcher.fetch("https://a.com").await.unwrap(),
            "<html>ok</html>"
        );
        assert!(matches!(
            fetcher.fetch("https://slow.com").await,
            Err(FetchError::Timeout { .. })
        ));
        assert!(matches!(
            fetcher.fetch("https://missing.com").await,
            Err(FetchError::Status { code: 404, .. })
        ));
    }
}
