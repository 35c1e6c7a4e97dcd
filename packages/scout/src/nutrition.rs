//! Open Food Facts client — the structured primary source for calorie
//! lookup. Scraping is only the fallback when this yields nothing.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::{NUTRITION_TIMEOUT, USER_AGENT};
use crate::error::{FetchError, FetchResult};

const SEARCH_URL: &str = "https://world.openfoodfacts.org/cgi/search.pl";

/// Energy fields of one product, as the database reports them.
///
/// `energy_100g` is in kilojoules; the kcal fields are kilocalories.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Nutriments {
    #[serde(rename = "energy-kcal_100g")]
    pub energy_kcal_100g: Option<f64>,

    #[serde(rename = "energy_100g")]
    pub energy_100g: Option<f64>,

    #[serde(rename = "energy-kcal_serving")]
    pub energy_kcal_serving: Option<f64>,
}

/// One product from the search response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OffProduct {
    #[serde(default)]
    pub product_name: Option<String>,

    #[serde(default)]
    pub product_name_pl: Option<String>,

    #[serde(default)]
    pub brands: Option<String>,

    #[serde(default)]
    pub nutriments: Nutriments,

    #[serde(default)]
    pub serving_size: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Vec<OffProduct>,
}

/// Structured nutrition lookup.
#[async_trait]
pub trait NutritionSource: Send + Sync {
    /// Search products by free-text query.
    async fn search(&self, query: &str, page_size: usize) -> FetchResult<Vec<OffProduct>>;
}

/// Open Food Facts search endpoint client.
pub struct OpenFoodFacts {
    client: reqwest::Client,
}

impl Default for OpenFoodFacts {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenFoodFacts {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(NUTRITION_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

#[async_trait]
impl NutritionSource for OpenFoodFacts {
    async fn search(&self, query: &str, page_size: usize) -> FetchResult<Vec<OffProduct>> {
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("search_terms", query),
                ("search_simple", "1"),
                ("action", "process"),
                ("json", "1"),
                ("page_size", &page_size.to_string()),
            ])
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: SEARCH_URL.to_string(),
                code: status.as_u16(),
            });
        }

        let parsed: SearchResponse = response.json().await.map_err(http_error)?;
        Ok(parsed.products)
    }
}

fn http_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: SEARCH_URL.to_string(),
        }
    } else {
        FetchError::Http {
            url: SEARCH_URL.to_string(),
            source: Box::new(e),
        }
    }
}

/// Mock nutrition source for tests.
#[derive(Default)]
pub struct MockNutrition {
    products: Vec<OffProduct>,
    fail: bool,
}

impl MockNutrition {
    /// Create a mock that returns no products.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return these products for every query.
    pub fn with_products(mut self, products: Vec<OffProduct>) -> Self {
        self.products = products;
        self
    }

    /// Make every call fail with a transport error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl NutritionSource for MockNutrition {
    async fn search(&self, _query: &str, page_size: usize) -> FetchResult<Vec<OffProduct>> {
        if self.fail {
            return Err(FetchError::Timeout {
                url: SEARCH_URL.to_string(),
            });
        }
        let mut products = self.products.clone();
        products.truncate(page_size);
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_renamed_energy_fields() {
        let json = r#"{
            "products": [{
                "product_name": "Bar",
                "nutriments": {
                    "energy-kcal_100g": 480.0,
                    "energy_100g": 2008.0,
                    "energy-kcal_serving": 120.0
                },
                "serving_size": "25 g",
                "url": "https://world.openfoodfacts.org/product/1"
            }]
        }"#;

        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        let p = &parsed.products[0];
        assert_eq!(p.nutriments.energy_kcal_100g, Some(480.0));
        assert_eq!(p.nutriments.energy_100g, Some(2008.0));
        assert_eq!(p.nutriments.energy_kcal_serving, Some(120.0));
        assert_eq!(p.serving_size.as_deref(), Some("25 g"));
    }

    #[test]
    fn tolerates_missing_fields() {
        let json = r#"{"products": [{"product_name": "Mystery"}]}"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.products[0].nutriments.energy_kcal_100g.is_none());
        assert!(parsed.products[0].url.is_none());
    }
}
