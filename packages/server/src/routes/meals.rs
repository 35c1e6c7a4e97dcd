//! Meal log and daily calorie goal.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::auth::require_user;
use crate::error::{AppError, AppResult};
use crate::models::Meal;
use crate::state::AppState;

const MIN_GOAL: i64 = 800;
const MAX_GOAL: i64 = 10_000;
const DEFAULT_GOAL: i64 = 2_000;

fn validate_kcal(kcal: i64) -> Result<i64, AppError> {
    if !(0..=10_000).contains(&kcal) {
        return Err(AppError::BadRequest(
            "Kalorie muszą mieścić się w zakresie 0–10000".into(),
        ));
    }
    Ok(kcal)
}

#[derive(Debug, Deserialize, Default)]
pub struct DayParams {
    /// Defaults to today when absent.
    pub date: Option<NaiveDate>,
}

/// Meals for one day, with the running total against the goal.
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<DayParams>,
) -> AppResult<Json<serde_json::Value>> {
    let user_id = require_user(&state, &headers).await?;
    let date = params.date.unwrap_or_else(|| chrono::Local::now().date_naive());

    let meals: Vec<Meal> =
        sqlx::query_as("SELECT * FROM meals WHERE user_id = ? AND date = ? ORDER BY id")
            .bind(user_id)
            .bind(date)
            .fetch_all(&state.pool)
            .await?;

    let goal: Option<i64> = sqlx::query_scalar("SELECT daily_kcal_goal FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(&state.pool)
        .await?;
    let goal = goal.unwrap_or(DEFAULT_GOAL);

    let total: i64 = meals.iter().map(|m| m.kcal).sum();
    Ok(Json(json!({
        "date": date,
        "meals": meals,
        "total_kcal": total,
        "goal_kcal": goal,
        "remaining_kcal": goal - total,
    })))
}

#[derive(Debug, Deserialize)]
pub struct MealInput {
    pub date: NaiveDate,
    pub name: String,
    pub kcal: i64,
}

pub async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<MealInput>,
) -> AppResult<Json<Meal>> {
    let user_id = require_user(&state, &headers).await?;
    let name = body.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("Nazwa posiłku jest wymagana".into()));
    }
    let kcal = validate_kcal(body.kcal)?;

    let result = sqlx::query("INSERT INTO meals (date, name, kcal, user_id) VALUES (?, ?, ?, ?)")
        .bind(body.date)
        .bind(&name)
        .bind(kcal)
        .bind(user_id)
        .execute(&state.pool)
        .await?;

    Ok(Json(Meal {
        id: result.last_insert_rowid(),
        date: body.date,
        name,
        kcal,
        user_id,
    }))
}

pub async fn edit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<MealInput>,
) -> AppResult<Json<Meal>> {
    let user_id = require_user(&state, &headers).await?;
    let name = body.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("Nazwa posiłku jest wymagana".into()));
    }
    let kcal = validate_kcal(body.kcal)?;

    let result = sqlx::query(
        "UPDATE meals SET date = ?, name = ?, kcal = ? WHERE id = ? AND user_id = ?",
    )
    .bind(body.date)
    .bind(&name)
    .bind(kcal)
    .bind(id)
    .bind(user_id)
    .execute(&state.pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::BadRequest("Nie znaleziono posiłku".into()));
    }

    Ok(Json(Meal {
        id,
        date: body.date,
        name,
        kcal,
        user_id,
    }))
}

pub async fn remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    let user_id = require_user(&state, &headers).await?;

    let result = sqlx::query("DELETE FROM meals WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::BadRequest("Nie znaleziono posiłku".into()));
    }

    Ok(Json(json!({ "deleted": id })))
}

#[derive(Debug, Deserialize)]
pub struct GoalInput {
    pub daily_kcal_goal: i64,
}

/// Set the daily calorie goal, clamped to a sane range.
pub async fn set_goal(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<GoalInput>,
) -> AppResult<Json<serde_json::Value>> {
    let user_id = require_user(&state, &headers).await?;
    let goal = body.daily_kcal_goal.clamp(MIN_GOAL, MAX_GOAL);

    sqlx::query("UPDATE users SET daily_kcal_goal = ? WHERE id = ?")
        .bind(goal)
        .bind(user_id)
        .execute(&state.pool)
        .await?;

    Ok(Json(json!({ "daily_kcal_goal": goal })))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::app::build_app;
    use crate::db::test_pool;
    use crate::state::AppState;

    async fn logged_in() -> (axum::Router, String) {
        let state = AppState::new(test_pool().await);
        let app = build_app(state.clone());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"email":"meals@example.com","password":"longenough"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();
        (app, cookie)
    }

    fn post_json(uri: &str, cookie: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, cookie)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn day_listing_totals_against_the_goal() {
        let (app, cookie) = logged_in().await;
        for (name, kcal) in [("owsianka", 350), ("obiad", 650)] {
            let response = app
                .clone()
                .oneshot(post_json(
                    "/meals",
                    &cookie,
                    &format!(r#"{{"date":"2024-03-01","name":"{name}","kcal":{kcal}}}"#),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/meals?date=2024-03-01")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_string(response).await;
        assert!(body.contains("\"total_kcal\":1000"));
        assert!(body.contains("\"goal_kcal\":2000"));
        assert!(body.contains("\"remaining_kcal\":1000"));
    }

    #[tokio::test]
    async fn goal_is_clamped() {
        let (app, cookie) = logged_in().await;
        let response = app
            .oneshot(post_json(
                "/meals/goal",
                &cookie,
                r#"{"daily_kcal_goal":100}"#,
            ))
            .await
            .unwrap();
        let body = body_string(response).await;
        assert!(body.contains("\"daily_kcal_goal\":800"));
    }

    #[tokio::test]
    async fn empty_meal_name_is_rejected() {
        let (app, cookie) = logged_in().await;
        let response = app
            .oneshot(post_json(
                "/meals",
                &cookie,
                r#"{"date":"2024-03-01","name":"  ","kcal":200}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn deleting_someone_elses_meal_fails() {
        let (app, cookie) = logged_in().await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/meals/999")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
