//! Best-Effort Web Sourcing
//!
//! Query-driven discovery and extraction of health tips, recipes and
//! calorie data from unstructured third-party pages.
//!
//! # Design Philosophy
//!
//! - Best effort, bounded results: an empty list is the only "not found"
//!   signal, and nothing here is fatal to the caller
//! - Failure paths are explicit: a skipped link is a matched error
//!   branch, not a swallowed exception
//! - No state between calls: every query, link list and page is built
//!   fresh and discarded
//! - Heuristics over site knowledge: extraction assumes nothing beyond
//!   "title tag" and "all visible text"
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use scout::{DuckDuckGo, HttpFetcher, RecipeFinder};
//!
//! let finder = RecipeFinder::new(
//!     Arc::new(DuckDuckGo::new()),
//!     Arc::new(HttpFetcher::new()),
//! );
//! let recipes = finder.find(&ingredients, 5).await?;
//! ```
//!
//! # Modules
//!
//! - [`discover`] - Search-engine link discovery
//! - [`fetch`] - Bounded-timeout page fetching
//! - [`extract`] - HTML → text plus the sentence/calorie heuristics
//! - [`nutrition`] - Structured nutrition database client
//! - [`translate`] - Best-effort translation collaborator
//! - [`pipelines`] - The three orchestrators (tips, recipes, kcal)

pub mod config;
pub mod discover;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod nutrition;
pub mod pipelines;
pub mod translate;
pub mod types;

// Re-export core types at crate root
pub use error::{DiscoverError, FetchError, Result, ScoutError};

pub use config::{TipConfig, USER_AGENT};
pub use discover::{DuckDuckGo, LinkDiscoverer, MockDiscoverer};
pub use extract::{extract_kcal, kj_to_kcal, recipe_kcal, KcalFacts, Page};
pub use fetch::{HttpFetcher, MockFetcher, PageFetcher};
pub use nutrition::{MockNutrition, NutritionSource, OffProduct, OpenFoodFacts};
pub use pipelines::{KcalFinder, RecipeFinder, TipFinder, FALLBACK_TIPS};
pub use translate::{GoogleTranslate, NoopTranslator, Translator};
pub use types::{CalorieEntry, Recipe};
