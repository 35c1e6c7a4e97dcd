//! Recipe search by ingredients.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

const MAX_RESULTS: usize = 10;
const DEFAULT_RESULTS: usize = 5;

#[derive(Debug, Deserialize)]
pub struct RecipeQuery {
    pub ingredients: Vec<String>,
    pub count: Option<usize>,
}

pub async fn search(
    State(state): State<AppState>,
    Json(body): Json<RecipeQuery>,
) -> AppResult<Json<Value>> {
    let ingredients: Vec<String> = body
        .ingredients
        .iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect();
    if ingredients.is_empty() {
        return Err(AppError::BadRequest(
            "Podaj co najmniej jeden składnik".into(),
        ));
    }
    let count = body.count.unwrap_or(DEFAULT_RESULTS).clamp(1, MAX_RESULTS);

    let recipes = state
        .recipes
        .find(&ingredients, count)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    if recipes.is_empty() {
        return Ok(Json(json!({
            "recipes": [],
            "error": "Nie znaleziono przepisu zawierającego wszystkie składniki.",
        })));
    }

    let slim: Vec<Value> = recipes
        .iter()
        .map(|r| json!({ "title": r.title, "url": r.url, "kcal": r.kcal }))
        .collect();
    Ok(Json(json!({ "recipes": slim })))
}
