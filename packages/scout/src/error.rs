//! Typed errors for the sourcing library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to keep failure
//! paths visible at the call site. Fetch failures are tagged outcomes
//! (timeout vs. status vs. transport) so pipelines skip candidates with
//! an explicit branch instead of a blanket catch.

use thiserror::Error;

/// Errors that can escape a pipeline call.
///
/// "No results" is never an error; pipelines signal exhaustion with an
/// empty list. Only discovery failures propagate (retryable by the
/// caller); per-link fetch failures are absorbed inside the pipelines.
#[derive(Debug, Error)]
pub enum ScoutError {
    /// Link discovery failed
    #[error("discovery failed: {0}")]
    Discover(#[from] DiscoverError),

    /// A fetch failed in a context where it cannot be skipped
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
}

/// Errors from the search-engine discovery step.
///
/// Discovery has no fallback path, so any transport or parse failure
/// fails the whole `discover` call.
#[derive(Debug, Error)]
pub enum DiscoverError {
    /// Search request failed at the transport level
    #[error("search request failed: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Search engine answered with a non-success status
    #[error("search engine returned HTTP {code}")]
    Status { code: u16 },
}

/// Errors from fetching a single candidate page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The per-request timeout fired
    #[error("timeout fetching {url}")]
    Timeout { url: String },

    /// Non-success HTTP status
    #[error("HTTP {code} from {url}")]
    Status { url: String, code: u16 },

    /// Transport failure (DNS, connection, malformed response)
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// URL could not be parsed
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for discovery operations.
pub type DiscoverResult<T> = std::result::Result<T, DiscoverError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
