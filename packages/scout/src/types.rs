//! Result types produced by the pipelines.
//!
//! Everything here is built fresh per call and carries no identity beyond
//! the response it ends up in.

use serde::Serialize;

/// A recipe accepted by the ingredient predicate.
#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
    /// Page title (or source URL when the page has no title).
    pub title: String,

    /// Source URL.
    pub url: String,

    /// Opportunistically parsed calorie count, when the page mentions one.
    pub kcal: Option<u32>,

    /// Full lowercased page text the acceptance predicate ran against.
    pub text: String,
}

/// One calorie-lookup result.
#[derive(Debug, Clone, Serialize)]
pub struct CalorieEntry {
    /// Product or page name.
    pub name: String,

    /// Calories per 100 g, reported directly or derived from kilojoules.
    pub kcal_100g: Option<f64>,

    /// Calories per serving, reported directly or derived from the
    /// serving size in grams.
    pub kcal_per_serving: Option<f64>,

    /// Serving size as reported by the source (e.g. "30 g").
    pub serving_size: Option<String>,

    /// Where the figures came from (product URL or page URL).
    pub source: String,
}
