//! Calorie-figure heuristics.
//!
//! All patterns run against lowercased text with decimal commas
//! normalized to dots. Per-100g figures are matched in either order and
//! in the slash form; per-serving figures come from an explicit serving
//! mention or are derived from a serving size in grams.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    // "per 100 g ... 250 kcal" and the reversed "250 kcal ... per 100 g"
    static ref KCAL_100G_AFTER: Regex =
        Regex::new(r"(?:per|na)\s*100\s*g[^\n]{0,40}?(\d{2,4})\s*kcal").unwrap();
    static ref KCAL_100G_BEFORE: Regex =
        Regex::new(r"(\d{2,4})\s*kcal[^\n]{0,40}?(?:per|na)\s*100\s*g").unwrap();
    // "250 kcal/100 g"
    static ref KCAL_100G_SLASH: Regex =
        Regex::new(r"(\d{2,4}(?:\.\d+)?)\s*(?:kcal|kilocalories)\s*/\s*100\s*g").unwrap();

    static ref KCAL_SERVING: Regex =
        Regex::new(r"(\d{2,4})\s*kcal[^\n]{0,40}?(?:per|na)\s*(serving|porcja|sztuka|piece)")
            .unwrap();
    static ref SERVING_GRAMS: Regex =
        Regex::new(r"(porcja|serving|sztuka|baton|piece)[^\n]{0,30}?(\d+(?:\.\d+)?)\s*g").unwrap();

    static ref GRAMS: Regex = Regex::new(r"(\d+(?:[\.,]\d+)?)\s*g").unwrap();

    static ref RECIPE_KCAL: Regex = Regex::new(r"(\d{2,4})\s?kcal").unwrap();
    static ref RECIPE_KALORIE: Regex = Regex::new(r"kalorie\s*(\d{2,4})").unwrap();
    static ref RECIPE_CALORIES: Regex = Regex::new(r"calories\s*(\d{2,4})").unwrap();
}

/// Calorie figures pulled from one page's text.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KcalFacts {
    pub kcal_100g: Option<f64>,
    pub kcal_serving: Option<f64>,
    pub serving_size: Option<String>,
}

impl KcalFacts {
    /// At least one usable figure was found.
    pub fn any(&self) -> bool {
        self.kcal_100g.is_some() || self.kcal_serving.is_some()
    }
}

/// Pull per-100g and per-serving calorie figures out of page text.
pub fn extract_kcal(text: &str) -> KcalFacts {
    let t = text.to_lowercase().replace(',', ".");

    let kcal_100g = KCAL_100G_AFTER
        .captures(&t)
        .or_else(|| KCAL_100G_BEFORE.captures(&t))
        .or_else(|| KCAL_100G_SLASH.captures(&t))
        .and_then(|c| c[1].parse::<f64>().ok());

    let mut kcal_serving = None;
    let mut serving_size = None;
    if let Some(c) = KCAL_SERVING.captures(&t) {
        kcal_serving = c[1].parse::<f64>().ok();
        serving_size = Some(c[2].to_string());
    }

    // No explicit per-serving figure, but a serving size in grams plus a
    // per-100g figure lets us derive one.
    if kcal_serving.is_none() {
        if let (Some(c), Some(per_100)) = (SERVING_GRAMS.captures(&t), kcal_100g) {
            if let Ok(grams) = c[2].parse::<f64>() {
                kcal_serving = Some(round1(per_100 * grams / 100.0));
                serving_size = Some(format!("{} g", grams));
            }
        }
    }

    KcalFacts {
        kcal_100g,
        kcal_serving,
        serving_size,
    }
}

/// Loose title-level calorie match for recipe pages.
pub fn recipe_kcal(text: &str) -> Option<u32> {
    RECIPE_KCAL
        .captures(text)
        .or_else(|| RECIPE_KALORIE.captures(text))
        .or_else(|| RECIPE_CALORIES.captures(text))
        .and_then(|c| c[1].parse::<u32>().ok())
}

/// Kilojoules → kilocalories, rounded to one decimal.
pub fn kj_to_kcal(kj: f64) -> f64 {
    round1(kj / 4.184)
}

/// Parse a serving-size string like "30 g" or "2,5 g" into grams.
pub fn parse_grams(s: &str) -> Option<f64> {
    let lowered = s.to_lowercase();
    let c = GRAMS.captures(&lowered)?;
    c[1].replace(',', ".").parse::<f64>().ok()
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kj_conversion_is_exact_at_the_definition_point() {
        assert_eq!(kj_to_kcal(4184.0), 1000.0);
    }

    #[test]
    fn kj_conversion_rounds_to_one_decimal() {
        assert_eq!(kj_to_kcal(1000.0), 239.0);
        assert_eq!(kj_to_kcal(550.0), 131.5);
    }

    #[test]
    fn matches_per_100g_in_both_orders() {
        let facts = extract_kcal("Wartość energetyczna na 100 g produktu 365 kcal");
        assert_eq!(facts.kcal_100g, Some(365.0));

        let facts = extract_kcal("about 365 kcal per 100 g of this food");
        assert_eq!(facts.kcal_100g, Some(365.0));
    }

    #[test]
    fn matches_slash_form() {
        let facts = extract_kcal("energy 412 kcal/100 g");
        assert_eq!(facts.kcal_100g, Some(412.0));
    }

    #[test]
    fn normalizes_decimal_commas() {
        let facts = extract_kcal("energia 412,5 kcal / 100 g");
        assert_eq!(facts.kcal_100g, Some(412.5));
    }

    #[test]
    fn matches_explicit_serving_figure() {
        let facts = extract_kcal("one bar has 98 kcal per serving of chocolate");
        assert_eq!(facts.kcal_serving, Some(98.0));
        assert_eq!(facts.serving_size.as_deref(), Some("serving"));
    }

    #[test]
    fn derives_serving_from_grams_and_per_100g() {
        let facts = extract_kcal("na 100 g 400 kcal, porcja 25 g");
        assert_eq!(facts.kcal_100g, Some(400.0));
        assert_eq!(facts.kcal_serving, Some(100.0));
        assert_eq!(facts.serving_size.as_deref(), Some("25 g"));
    }

    #[test]
    fn absent_when_no_pattern_matches() {
        let facts = extract_kcal("a page about cats with no nutrition data at all");
        assert!(!facts.any());
    }

    #[test]
    fn recipe_kcal_tries_all_three_shapes() {
        assert_eq!(recipe_kcal("danie ma 540 kcal na talerzu"), Some(540));
        assert_eq!(recipe_kcal("kalorie 320 w porcji"), Some(320));
        assert_eq!(recipe_kcal("calories 410 total"), Some(410));
        assert_eq!(recipe_kcal("no numbers here"), None);
    }

    #[test]
    fn parses_serving_grams() {
        assert_eq!(parse_grams("30 g"), Some(30.0));
        assert_eq!(parse_grams("2,5 g"), Some(2.5));
        assert_eq!(parse_grams("a handful"), None);
    }
}
