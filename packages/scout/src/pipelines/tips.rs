//! Health-tip pipeline.
//!
//! Walks a fixed ordered list of trusted sources and stops at the first
//! one that yields at least one qualifying sentence. When every source
//! fails or qualifies nothing, a built-in Polish tip is used instead, so
//! this pipeline always produces a tip.

use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::config::TipConfig;
use crate::extract::{block_texts, candidate_sentences};
use crate::fetch::PageFetcher;
use crate::translate::Translator;

/// Pre-translated tips used when no source yields a qualifying sentence.
pub const FALLBACK_TIPS: [&str; 10] = [
    "Jedz dużo warzyw, owoców i pełnoziarnistych produktów.",
    "Wybieraj chude źródła białka i zdrowe tłuszcze.",
    "Ogranicz cukry dodane i wysoko przetworzone produkty.",
    "Pij wodę i jedz regularnie, dbając o porcje.",
    "Włącz do diety strączki, orzechy i nasiona.",
    "Zmniejsz spożycie soli; zamieniaj ją na zioła i przyprawy.",
    "Wybieraj produkty z wysoką zawartością błonnika dla sytości.",
    "Planuj posiłki z wyprzedzeniem, aby jeść bardziej świadomie.",
    "Uważne jedzenie pomaga kontrolować porcje i kalorie.",
    "Zadbaj o nawodnienie — woda przed posiłkiem może zmniejszyć łaknienie.",
];

/// Produces one health tip per call.
pub struct TipFinder {
    fetcher: Arc<dyn PageFetcher>,
    translator: Arc<dyn Translator>,
    config: TipConfig,
    rng: Mutex<StdRng>,
}

impl TipFinder {
    pub fn new(fetcher: Arc<dyn PageFetcher>, translator: Arc<dyn Translator>) -> Self {
        Self {
            fetcher,
            translator,
            config: TipConfig::default(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Replace the source/keyword configuration.
    pub fn with_config(mut self, config: TipConfig) -> Self {
        self.config = config;
        self
    }

    /// Seed the random selection, making the choice deterministic.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Fetch one tip. Never errors; the fallback list guarantees output.
    pub async fn fetch_tip(&self) -> String {
        let mut candidates: Vec<String> = Vec::new();

        for source in &self.config.sources {
            let html = match self.fetcher.fetch(source).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(url = %source, error = %e, "tip source unavailable, trying next");
                    continue;
                }
            };

            let blocks = block_texts(&html);
            candidates = candidate_sentences(&blocks, &self.config.keywords);
            if !candidates.is_empty() {
                debug!(url = %source, candidates = candidates.len(), "tip source accepted");
                break;
            }
        }

        let tip = if candidates.is_empty() {
            debug!("no source yielded a qualifying sentence, using built-in tips");
            FALLBACK_TIPS
                .choose(&mut *self.rng.lock().unwrap())
                .map(|s| s.to_string())
                .unwrap_or_default()
        } else {
            candidates
                .choose(&mut *self.rng.lock().unwrap())
                .cloned()
                .unwrap_or_default()
        };

        self.translator.to_polish(&tip).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockFetcher;
    use crate::translate::NoopTranslator;

    const GOOD_SENTENCE: &str = "Eating plenty of vegetables and fruit every day helps \
                                 keep your diet balanced and your heart healthy.";

    fn page_with_good_sentence() -> String {
        format!("<html><body><p>{GOOD_SENTENCE}</p></body></html>")
    }

    #[tokio::test]
    async fn first_source_with_candidates_wins() {
        let config = TipConfig::default().with_sources([
            "https://first.example/tips",
            "https://second.example/tips",
        ]);
        let fetcher = MockFetcher::new()
            .with_page("https://first.example/tips", &page_with_good_sentence())
            .with_page(
                "https://second.example/tips",
                "<html><body><p>Second source text that should never be reached at all, \
                 with vegetables and healthy diet words included here.</p></body></html>",
            );

        let finder = TipFinder::new(Arc::new(fetcher), Arc::new(NoopTranslator))
            .with_config(config)
            .with_seed(7);

        assert_eq!(finder.fetch_tip().await, GOOD_SENTENCE);
    }

    #[tokio::test]
    async fn all_sources_failing_falls_back_to_builtin_tips() {
        let config = TipConfig::default();
        let mut fetcher = MockFetcher::new();
        for source in &config.sources {
            fetcher = fetcher.with_timeout(source);
        }

        let finder =
            TipFinder::new(Arc::new(fetcher), Arc::new(NoopTranslator)).with_seed(11);

        let tip = finder.fetch_tip().await;
        assert!(FALLBACK_TIPS.contains(&tip.as_str()));
    }

    #[tokio::test]
    async fn unqualifying_content_also_falls_back() {
        let config = TipConfig::default().with_sources(["https://only.example/tips"]);
        let fetcher = MockFetcher::new().with_page(
            "https://only.example/tips",
            "<html><body><p>Short text.</p><p>Menu: item | item</p></body></html>",
        );

        let finder = TipFinder::new(Arc::new(fetcher), Arc::new(NoopTranslator))
            .with_config(config)
            .with_seed(3);

        let tip = finder.fetch_tip().await;
        assert!(FALLBACK_TIPS.contains(&tip.as_str()));
    }
}
