//! Shared application state.

use std::sync::Arc;

use scout::config::KCAL_FETCH_TIMEOUT;
use scout::discover::{DuckDuckGo, LinkDiscoverer};
use scout::fetch::{HttpFetcher, PageFetcher};
use scout::nutrition::OpenFoodFacts;
use scout::pipelines::kcal::KcalFinder;
use scout::pipelines::recipes::RecipeFinder;
use scout::pipelines::tips::TipFinder;
use scout::translate::GoogleTranslate;
use sqlx::SqlitePool;

use crate::auth::SessionStore;
use crate::charts::ChartService;

/// Everything handlers need, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub sessions: Arc<SessionStore>,
    pub tips: Arc<TipFinder>,
    pub recipes: Arc<RecipeFinder>,
    pub kcal: Arc<KcalFinder>,
    pub charts: Arc<ChartService>,
}

impl AppState {
    /// Wire up the default production collaborators.
    pub fn new(pool: SqlitePool) -> Self {
        let discoverer: Arc<dyn LinkDiscoverer> = Arc::new(DuckDuckGo::new());
        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new());

        Self {
            pool,
            sessions: Arc::new(SessionStore::new()),
            tips: Arc::new(TipFinder::new(
                Arc::clone(&fetcher),
                Arc::new(GoogleTranslate::new()),
            )),
            recipes: Arc::new(RecipeFinder::new(
                Arc::clone(&discoverer),
                Arc::clone(&fetcher),
            )),
            kcal: Arc::new(KcalFinder::new(
                Arc::new(OpenFoodFacts::new()),
                discoverer,
                Arc::new(HttpFetcher::with_timeout(KCAL_FETCH_TIMEOUT)),
            )),
            charts: Arc::new(ChartService::new()),
        }
    }
}
