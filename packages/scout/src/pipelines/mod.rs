//! Pipeline orchestrators: discovery → fetch → extract → accept → cap.
//!
//! Each pipeline builds everything per call and keeps no state between
//! calls. Per-link failures are skipped with a logged branch; only
//! discovery failures propagate.

pub mod kcal;
pub mod recipes;
pub mod tips;

pub use kcal::KcalFinder;
pub use recipes::RecipeFinder;
pub use tips::{TipFinder, FALLBACK_TIPS};
