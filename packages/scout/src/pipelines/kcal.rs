//! Calorie-lookup pipeline.
//!
//! Primary path is the structured nutrition database; the scraping
//! fallback only runs when the primary yields nothing (zero usable
//! products or a transport error).

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::LINKS_PER_QUERY;
use crate::discover::LinkDiscoverer;
use crate::error::Result;
use crate::extract::{extract_kcal, kj_to_kcal, parse_grams, round1, Page};
use crate::fetch::PageFetcher;
use crate::nutrition::{NutritionSource, OffProduct};
use crate::types::CalorieEntry;

/// Looks up calorie figures for a product query.
pub struct KcalFinder {
    nutrition: Arc<dyn NutritionSource>,
    discoverer: Arc<dyn LinkDiscoverer>,
    fetcher: Arc<dyn PageFetcher>,
}

impl KcalFinder {
    /// `fetcher` should carry the tighter fallback timeout
    /// ([`crate::config::KCAL_FETCH_TIMEOUT`]).
    pub fn new(
        nutrition: Arc<dyn NutritionSource>,
        discoverer: Arc<dyn LinkDiscoverer>,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Self {
        Self {
            nutrition,
            discoverer,
            fetcher,
        }
    }

    /// Return up to `max_results` entries with at least one calorie
    /// figure each.
    pub async fn find(&self, query: &str, max_results: usize) -> Result<Vec<CalorieEntry>> {
        let primary = match self.nutrition.search(query, max_results).await {
            Ok(products) => entries_from_products(products, max_results),
            Err(e) => {
                warn!(error = %e, "nutrition database unavailable, falling back to scraping");
                Vec::new()
            }
        };

        if !primary.is_empty() {
            return Ok(primary);
        }

        debug!(query = %query, "primary path empty, running scraping fallback");
        self.fallback_search(query, max_results).await
    }

    async fn fallback_search(&self, query: &str, max_results: usize) -> Result<Vec<CalorieEntry>> {
        let queries = [
            format!("kcal {query}"),
            format!("kalorie {query}"),
            format!("{query} kalorie 100 g"),
            format!("{query} calories 100 g"),
            format!("{query} kcal per serving"),
        ];

        let mut seen: HashSet<String> = HashSet::new();
        let mut links: Vec<String> = Vec::new();
        for q in &queries {
            for link in self.discoverer.discover(q, LINKS_PER_QUERY).await? {
                if seen.insert(link.clone()) {
                    links.push(link);
                }
            }
        }

        let mut results: Vec<CalorieEntry> = Vec::new();
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
            let facts = extract_kcal(&page.text);
            if facts.any() {
                results.push(CalorieEntry {
                    name: page.title,
                    kcal_100g: facts.kcal_100g,
                    kcal_per_serving: facts.kcal_serving,
                    serving_size: facts.serving_size,
                    source: page.url,
                });
            }
        }

        Ok(results)
    }
}

/// Map database products to calorie entries, deriving missing figures.
fn entries_from_products(products: Vec<OffProduct>, max_results: usize) -> Vec<CalorieEntry> {
    let mut entries = Vec::new();

    for product in products {
        let name = [
            product.product_name.clone(),
            product.product_name_pl.clone(),
            product.brands.clone(),
        ]
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| "Produkt".to_string());

        // Direct kcal reporting wins; otherwise derive from kilojoules.
        let kcal_100g = product
            .nutriments
            .energy_kcal_100g
            .or_else(|| product.nutriments.energy_100g.map(kj_to_kcal));

        let mut kcal_per_serving = product.nutriments.energy_kcal_serving;
        if kcal_per_serving.is_none() {
            if let (Some(grams), Some(per_100)) = (
                product.serving_size.as_deref().and_then(parse_grams),
                kcal_100g,
            ) {
                kcal_per_serving = Some(round1(per_100 * grams / 100.0));
            }
        }

        if kcal_100g.is_none() && kcal_per_serving.is_none() {
            continue;
        }

        entries.push(CalorieEntry {
            name,
            kcal_100g,
            kcal_per_serving,
            serving_size: product.serving_size,
            source: product.url.or(product.id).unwrap_or_default(),
        });

        if entries.len() >= max_results {
            break;
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discover::MockDiscoverer;
    use crate::fetch::MockFetcher;
    use crate::nutrition::{MockNutrition, Nutriments};

    fn product(name: &str, nutriments: Nutriments, serving: Option<&str>) -> OffProduct {
        OffProduct {
            product_name: Some(name.to_string()),
            nutriments,
            serving_size: serving.map(String::from),
            url: Some(format!("https://off.example/{name}")),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn derives_kcal_100g_from_kilojoules() {
        let nutrition = MockNutrition::new().with_products(vec![product(
            "Bar",
            Nutriments {
                energy_100g: Some(4184.0),
                ..Default::default()
            },
            None,
        )]);
        let finder = KcalFinder::new(
            Arc::new(nutrition),
            Arc::new(MockDiscoverer::new()),
            Arc::new(MockFetcher::new()),
        );

        let entries = finder.find("bar", 5).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kcal_100g, Some(1000.0));
    }

    #[tokio::test]
    async fn derives_serving_from_grams() {
        let nutrition = MockNutrition::new().with_products(vec![product(
            "Snack",
            Nutriments {
                energy_kcal_100g: Some(400.0),
                ..Default::default()
            },
            Some("25 g"),
        )]);
        let finder = KcalFinder::new(
            Arc::new(nutrition),
            Arc::new(MockDiscoverer::new()),
            Arc::new(MockFetcher::new()),
        );

        let entries = finder.find("snack", 5).await.unwrap();
        assert_eq!(entries[0].kcal_per_serving, Some(100.0));
        assert_eq!(entries[0].serving_size.as_deref(), Some("25 g"));
    }

    #[tokio::test]
    async fn products_without_figures_are_dropped() {
        let nutrition = MockNutrition::new()
            .with_products(vec![product("Mystery", Nutriments::default(), None)]);
        let finder = KcalFinder::new(
            Arc::new(nutrition),
            Arc::new(MockDiscoverer::new()),
            Arc::new(MockFetcher::new()),
        );

        // No usable products and an empty fallback: empty result, no error.
        let entries = finder.find("mystery", 5).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn empty_primary_invokes_scraping_fallback() {
        let nutrition = MockNutrition::new();
        let discoverer = MockDiscoverer::new().with_links_for_any(&["https://food.example/p"]);
        let fetcher = MockFetcher::new().with_page(
            "https://food.example/p",
            "<html><head><title>Oat bar</title></head>\
             <body><p>na 100 g 365 kcal</p></body></html>",
        );

        let finder = KcalFinder::new(Arc::new(nutrition), Arc::new(discoverer), Arc::new(fetcher));
        let entries = finder.find("oat bar", 5).await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Oat bar");
        assert_eq!(entries[0].kcal_100g, Some(365.0));
        assert_eq!(entries[0].source, "https://food.example/p");
    }

    #[tokio::test]
    async fn primary_error_also_invokes_fallback() {
        let nutrition = MockNutrition::new().failing();
        let discoverer = MockDiscoverer::new().with_links_for_any(&["https://food.example/p"]);
        let fetcher = MockFetcher::new().with_page(
            "https://food.example/p",
            "<html><body><p>about 210 kcal per 100 g cooked</p></body></html>",
        );

        let finder = KcalFinder::new(Arc::new(nutrition), Arc::new(discoverer), Arc::new(fetcher));
        let entries = finder.find("rice", 5).await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kcal_100g, Some(210.0));
    }
}
