//! Link discovery against a search engine's HTML results page.
//!
//! Turns a free-text query into candidate destination URLs. The engine
//! wraps outbound links in a redirector (`uddg` query parameter) that has
//! to be unwrapped to recover the true destination. Result order is
//! shuffled before returning so downstream pipelines are not biased
//! toward the engine's own ranking.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use lazy_static::lazy_static;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::config::{DEFAULT_FETCH_TIMEOUT, USER_AGENT};
use crate::error::{DiscoverError, DiscoverResult};

/// HTML (no-JavaScript) search endpoint.
const SEARCH_ENDPOINT: &str = "https://duckduckgo.com/html/";

/// Base origin for resolving site-relative hrefs.
const SEARCH_BASE: &str = "https://duckduckgo.com";

/// Query parameter the engine uses to wrap outbound result links.
const REDIRECT_PARAM: &str = "uddg";

lazy_static! {
    // Anchors carrying this class are the organic result links. If the
    // engine changes its markup this silently yields zero links, not an
    // error.
    static ref RESULT_LINK: Selector = Selector::parse("a.result__a").unwrap();
}

/// Discovers candidate URLs for a text query.
#[async_trait]
pub trait LinkDiscoverer: Send + Sync {
    /// Return up to `limit` unique candidate URLs for `query`.
    ///
    /// An empty list is the exhaustion signal; transport failures are
    /// returned to the caller (retryable there, never retried here).
    async fn discover(&self, query: &str, limit: usize) -> DiscoverResult<Vec<String>>;
}

/// DuckDuckGo HTML-page discoverer.
pub struct DuckDuckGo {
    client: reqwest::Client,
    rng: Mutex<StdRng>,
}

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new()
    }
}

impl DuckDuckGo {
    /// Create a discoverer with the default timeout and an entropy-seeded
    /// shuffle.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(DEFAULT_FETCH_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Seed the shuffle, making result order deterministic (for tests).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }
}

#[async_trait]
impl LinkDiscoverer for DuckDuckGo {
    async fn discover(&self, query: &str, limit: usize) -> DiscoverResult<Vec<String>> {
        let url = format!("{}?q={}", SEARCH_ENDPOINT, urlencoding::encode(query));

        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| DiscoverError::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiscoverError::Status {
                code: status.as_u16(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| DiscoverError::Http(Box::new(e)))?;

        let mut links = parse_result_links(&html, limit);
        debug!(query = %query, links = links.len(), "search results parsed");

        links.shuffle(&mut *self.rng.lock().unwrap());
        Ok(links)
    }
}

/// Extract up to `limit` unique, normalized result URLs from a results
/// page.
pub fn parse_result_links(html: &str, limit: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut seen: HashSet<String> = HashSet::new();
    let mut links: Vec<String> = Vec::new();

    for anchor in document.select(&RESULT_LINK) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(link) = normalize_href(href) else {
            continue;
        };
        if seen.insert(link.clone()) {
            links.push(link);
        }
        if links.len() >= limit {
            break;
        }
    }

    links
}

/// Normalize a raw href from the results page.
///
/// Protocol-relative hrefs get the secure scheme, site-relative ones are
/// resolved against the engine's origin, and redirector-wrapped links are
/// replaced by their decoded `uddg` destination. Anything else passes
/// through unchanged.
fn normalize_href(href: &str) -> Option<String> {
    if href.is_empty() {
        return None;
    }

    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else if href.starts_with('/') {
        let base = Url::parse(SEARCH_BASE).ok()?;
        base.join(href).ok()?.to_string()
    } else {
        href.to_string()
    };

    if let Ok(parsed) = Url::parse(&absolute) {
        // query_pairs percent-decodes the redirect target for us
        if let Some((_, target)) = parsed.query_pairs().find(|(k, _)| k == REDIRECT_PARAM) {
            if !target.is_empty() {
                return Some(target.into_owned());
            }
        }
    }

    Some(absolute)
}

/// Mock discoverer for tests: canned query → links.
#[derive(Default)]
pub struct MockDiscoverer {
    results: HashMap<String, Vec<String>>,
    fail: bool,
}

impl MockDiscoverer {
    /// Create an empty mock (every query yields no links).
    pub fn new() -> Self {
        Self::default()
    }

    /// Register links for a query.
    pub fn with_links(mut self, query: &str, links: &[&str]) -> Self {
        self.results
            .insert(query.to_string(), links.iter().map(|l| l.to_string()).collect());
        self
    }

    /// Register the same links for every query.
    pub fn with_links_for_any(mut self, links: &[&str]) -> Self {
        self.results
            .insert(String::new(), links.iter().map(|l| l.to_string()).collect());
        self
    }

    /// Make every call fail with a transport error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl LinkDiscoverer for MockDiscoverer {
    async fn discover(&self, query: &str, limit: usize) -> DiscoverResult<Vec<String>> {
        if self.fail {
            return Err(DiscoverError::Status { code: 503 });
        }
        let mut links = self
            .results
            .get(query)
            .or_else(|| self.results.get(""))
            .cloned()
            .unwrap_or_default();
        links.truncate(limit);
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_redirector_links() {
        let link = normalize_href("/l/?uddg=https%3A%2F%2Fexample.com%2Fpage").unwrap();
        assert_eq!(link, "https://example.com/page");
    }

    #[test]
    fn unwraps_protocol_relative_redirector() {
        let link =
            normalize_href("//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=abc").unwrap();
        assert_eq!(link, "https://example.com");
    }

    #[test]
    fn resolves_site_relative_without_redirector() {
        let link = normalize_href("/html/?q=next").unwrap();
        assert_eq!(link, "https://duckduckgo.com/html/?q=next");
    }

    #[test]
    fn keeps_plain_absolute_hrefs() {
        let link = normalize_href("https://example.com/direct").unwrap();
        assert_eq!(link, "https://example.com/direct");
    }

    #[test]
    fn parses_unique_links_up_to_limit() {
        let html = r#"
            <div class="result"><a class="result__a" href="https://a.com/1">A</a></div>
            <div class="result"><a class="result__a" href="https://a.com/1">A again</a></div>
            <div class="result"><a class="result__a" href="https://b.com/2">B</a></div>
            <div class="result"><a class="result__a" href="https://c.com/3">C</a></div>
            <a href="https://not-a-result.com">nav</a>
        "#;

        let links = parse_result_links(html, 2);
        assert_eq!(links, vec!["https://a.com/1", "https://b.com/2"]);
    }

    #[test]
    fn parses_wrapped_links_from_results_page() {
        let html = r#"
            <a class="result__a" href="/l/?uddg=https%3A%2F%2Fexample.com%2Fpage">Example</a>
        "#;

        let links = parse_result_links(html, 10);
        assert_eq!(links, vec!["https://example.com/page"]);
    }

    #[tokio::test]
    async fn mock_discoverer_truncates_and_fails() {
        let mock = MockDiscoverer::new().with_links("q", &["https://a.com", "https://b.com"]);
        let links = mock.discover("q", 1).await.unwrap();
        assert_eq!(links.len(), 1);

        let failing = MockDiscoverer::new().failing();
        assert!(failing.discover("q", 5).await.is_err());
    }
}
