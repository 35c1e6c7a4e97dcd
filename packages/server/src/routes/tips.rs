//! Daily health tip.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// One tip per call. The pipeline guarantees a tip, so this endpoint
/// never fails and needs no session.
pub async fn daily_tip(State(state): State<AppState>) -> Json<Value> {
    let tip = state.tips.fetch_tip().await;
    Json(json!({ "tip": tip }))
}
