//! Text and fact extraction from fetched HTML.
//!
//! [`page`] turns raw HTML into title + plain text with no site-specific
//! assumptions; [`sentence`] and [`kcal`] are the domain heuristics that
//! pull qualifying sentences and calorie figures out of that text.

pub mod kcal;
pub mod page;
pub mod sentence;

pub use kcal::{extract_kcal, kj_to_kcal, parse_grams, recipe_kcal, round1, KcalFacts};
pub use page::{block_texts, Page};
pub use sentence::candidate_sentences;
