//! Configuration data for the sourcing pipelines.
//!
//! Source URL and keyword lists live here as data rather than inside the
//! algorithms, so tests can substitute their own.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// User-Agent header sent on every outbound request.
pub const USER_AGENT: &str = "WeightTracker/1.0";

/// Timeout for tip-source and recipe-page fetches.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(8);

/// Timeout for the calorie-lookup fallback fetches.
pub const KCAL_FETCH_TIMEOUT: Duration = Duration::from_secs(6);

/// Timeout for the nutrition database query.
pub const NUTRITION_TIMEOUT: Duration = Duration::from_secs(5);

/// Links requested from the search engine per query variant.
pub const LINKS_PER_QUERY: usize = 20;

/// Configuration for the health-tip pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipConfig {
    /// Trusted sources, tried in order; the first one yielding a
    /// qualifying sentence wins.
    pub sources: Vec<String>,

    /// A sentence qualifies only if it contains at least one of these
    /// (matched case-insensitively).
    pub keywords: Vec<String>,
}

impl Default for TipConfig {
    fn default() -> Self {
        Self {
            sources: [
                "https://www.who.int/news-room/fact-sheets/detail/healthy-diet",
                "https://www.nhs.uk/live-well/eat-well/",
                "https://www.cdc.gov/healthyweight/healthy_eating/index.html",
                "https://www.hsph.harvard.edu/nutritionsource/healthy-eating-plate/",
                "https://www.who.int/news-room/articles-detail/healthy-diet",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            keywords: [
                "diet", "healthy", "vegetable", "fruit", "whole", "grain", "fiber", "salt",
                "sugar", "protein", "fat", "water", "hydrate", "portion", "calorie", "nuts",
                "seeds", "legumes",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl TipConfig {
    /// Create a config with the default source and keyword lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the source list.
    pub fn with_sources(mut self, sources: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.sources = sources.into_iter().map(|s| s.into()).collect();
        self
    }

    /// Replace the keyword list.
    pub fn with_keywords(mut self, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.keywords = keywords.into_iter().map(|k| k.into()).collect();
        self
    }
}
