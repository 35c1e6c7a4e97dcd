//! Router assembly.

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::state::AppState;

/// Build the full application router.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route(
            "/measurements",
            get(routes::measurements::list).post(routes::measurements::add),
        )
        .route(
            "/measurements/:id",
            put(routes::measurements::edit).delete(routes::measurements::remove),
        )
        .route("/stats", get(routes::measurements::stats))
        .route("/export", get(routes::measurements::export_csv))
        .route("/import", post(routes::measurements::import_csv))
        .route("/meals", get(routes::meals::list).post(routes::meals::add))
        .route("/meals/goal", post(routes::meals::set_goal))
        .route(
            "/meals/:id",
            put(routes::meals::edit).delete(routes::meals::remove),
        )
        .route("/tips", get(routes::tips::daily_tip))
        .route("/recipes", post(routes::recipes::search))
        .route("/kcal", post(routes::kcal::search))
        .route("/plot", get(routes::plots::weight_history))
        .route("/plot-weekly-changes", get(routes::plots::weekly_changes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
