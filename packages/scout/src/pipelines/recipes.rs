//! Recipe discovery pipeline.
//!
//! Discovers candidate pages through several Polish/English query
//! variants and accepts a page only when every requested ingredient
//! appears in its text. Fetch failures skip the candidate; discovery
//! failures propagate to the caller.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::config::LINKS_PER_QUERY;
use crate::discover::LinkDiscoverer;
use crate::error::Result;
use crate::extract::{recipe_kcal, Page};
use crate::fetch::PageFetcher;
use crate::types::Recipe;

/// Finds recipes containing every requested ingredient.
pub struct RecipeFinder {
    discoverer: Arc<dyn LinkDiscoverer>,
    fetcher: Arc<dyn PageFetcher>,
    rng: Mutex<StdRng>,
}

impl RecipeFinder {
    pub fn new(discoverer: Arc<dyn LinkDiscoverer>, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            discoverer,
            fetcher,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Seed the candidate shuffle, making traversal order deterministic.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Return up to `max_results` recipes whose page text contains every
    /// ingredient token (case-insensitive). Callers clamp `max_results`
    /// to 1–10.
    pub async fn find(&self, ingredients: &[String], max_results: usize) -> Result<Vec<Recipe>> {
        let joined = ingredients.join(" ");
        let queries = [
            format!("przepis {joined}"),
            format!("przepis na {joined}"),
            format!("recipe {joined}"),
            format!("danie {joined}"),
        ];

        let mut seen: HashSet<String> = HashSet::new();
        let mut links: Vec<String> = Vec::new();
        for query in &queries {
            for link in self.discoverer.discover(query, LINKS_PER_QUERY).await? {
                if seen.insert(link.clone()) {
                    links.push(link);
                }
            }
        }
        debug!(candidates = links.len(), "recipe candidates discovered");

        links.shuffle(&mut *self.rng.lock().unwrap());

        let tokens: Vec<String> = ingredients
            .iter()
            .map(|i| i.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        let mut results: Vec<Recipe> = Vec::new();
        for link in links {
            if results.len() >= max_results {
                break;
            }

            let html = match self.fetcher.fetch(&link).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(url = %link, error = %e, "skipping unreachable candidate");
                    continue;
                }
            };

            let page = Page::from_html(&link, &html);

            if !tokens.iter().all(|t| page.text.contains(t.as_str())) {
                continue;
            }
            if results.iter().any(|r| r.title == page.title) {
                continue;
            }

            let kcal = recipe_kcal(&page.text);
            results.push(Recipe {
                title: page.title,
                url: page.url,
                kcal,
                text: page.text,
            });
        }

        Ok(results)
    }
}
