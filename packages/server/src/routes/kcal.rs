//! Calorie lookup for a product name.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

const MAX_RESULTS: usize = 8;

#[derive(Debug, Deserialize)]
pub struct KcalQuery {
    pub product: String,
}

pub async fn search(
    State(state): State<AppState>,
    Json(body): Json<KcalQuery>,
) -> AppResult<Json<Value>> {
    let product = body.product.trim();
    if product.is_empty() {
        return Err(AppError::BadRequest("Podaj nazwę produktu".into()));
    }

    let entries = state
        .kcal
        .find(product, MAX_RESULTS)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    if entries.is_empty() {
        return Ok(Json(json!({
            "entries": [],
            "error": "Nie znaleziono danych kaloryczności.",
        })));
    }

    Ok(Json(json!({ "entries": entries })))
}
