//! Weight measurement CRUD, statistics, CSV import/export.

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::auth::require_user;
use crate::error::{AppError, AppResult};
use crate::models::Measurement;
use crate::state::AppState;
use crate::stats::{compute_weekly_changes, filter_by_periods};

const CSV_DATE_FORMAT: &str = "%d/%m/%Y";

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn validate_weight(weight_kg: f64) -> Result<f64, AppError> {
    if !(1.0..=500.0).contains(&weight_kg) {
        return Err(AppError::BadRequest(
            "Masa musi mieścić się w zakresie 1–500 kg".into(),
        ));
    }
    Ok(round1(weight_kg))
}

async fn user_measurements(state: &AppState, user_id: i64) -> AppResult<Vec<Measurement>> {
    let rows = sqlx::query_as("SELECT * FROM measurements WHERE user_id = ? ORDER BY date")
        .bind(user_id)
        .fetch_all(&state.pool)
        .await?;
    Ok(rows)
}

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
    /// Comma-separated periods: `2024`, `2024-03`, `2024Q2`, `2024H1`.
    pub periods: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Measurement>>> {
    let user_id = require_user(&state, &headers).await?;
    let mut measurements = user_measurements(&state, user_id).await?;
    if let Some(spec) = params.periods.as_deref() {
        measurements = filter_by_periods(measurements, spec);
    }
    Ok(Json(measurements))
}

#[derive(Debug, Deserialize)]
pub struct MeasurementInput {
    pub date: NaiveDate,
    pub weight_kg: f64,
}

pub async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<MeasurementInput>,
) -> AppResult<Json<Measurement>> {
    let user_id = require_user(&state, &headers).await?;
    let weight_kg = validate_weight(body.weight_kg)?;

    let result = sqlx::query("INSERT INTO measurements (date, weight_kg, user_id) VALUES (?, ?, ?)")
        .bind(body.date)
        .bind(weight_kg)
        .bind(user_id)
        .execute(&state.pool)
        .await?;

    Ok(Json(Measurement {
        id: result.last_insert_rowid(),
        date: body.date,
        weight_kg,
        user_id: Some(user_id),
    }))
}

pub async fn edit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<MeasurementInput>,
) -> AppResult<Json<Measurement>> {
    let user_id = require_user(&state, &headers).await?;
    let weight_kg = validate_weight(body.weight_kg)?;

    let result =
        sqlx::query("UPDATE measurements SET date = ?, weight_kg = ? WHERE id = ? AND user_id = ?")
            .bind(body.date)
            .bind(weight_kg)
            .bind(id)
            .bind(user_id)
            .execute(&state.pool)
            .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::BadRequest("Nie znaleziono pomiaru".into()));
    }

    Ok(Json(Measurement {
        id,
        date: body.date,
        weight_kg,
        user_id: Some(user_id),
    }))
}

pub async fn remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    let user_id = require_user(&state, &headers).await?;

    let result = sqlx::query("DELETE FROM measurements WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::BadRequest("Nie znaleziono pomiaru".into()));
    }

    Ok(Json(json!({ "deleted": id })))
}

pub async fn stats(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> AppResult<Json<serde_json::Value>> {
    let user_id = require_user(&state, &headers).await?;
    let mut measurements = user_measurements(&state, user_id).await?;
    if let Some(spec) = params.periods.as_deref() {
        measurements = filter_by_periods(measurements, spec);
    }

    let changes = compute_weekly_changes(&measurements);
    let last = changes.last().map(|c| c.kg_per_week);
    let average = if changes.is_empty() {
        None
    } else {
        let sum: f64 = changes.iter().map(|c| c.kg_per_week).sum();
        Some((sum / changes.len() as f64 * 1000.0).round() / 1000.0)
    };

    Ok(Json(json!({
        "measurements": measurements.len(),
        "weekly_changes": changes,
        "last_kg_per_week": last,
        "average_kg_per_week": average,
    })))
}

pub async fn export_csv(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    let user_id = require_user(&state, &headers).await?;
    let measurements = user_measurements(&state, user_id).await?;

    let mut csv = String::from("date,weight_kg\n");
    for m in &measurements {
        csv.push_str(&format!(
            "{},{}\n",
            m.date.format(CSV_DATE_FORMAT),
            m.weight_kg
        ));
    }

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"measurements.csv\"".to_string(),
            ),
        ],
        csv,
    )
        .into_response())
}

/// Import measurements from a CSV body. Rows are `dd/mm/yyyy,weight`;
/// unparseable rows and a leading header row are skipped.
pub async fn import_csv(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Json<serde_json::Value>> {
    let user_id = require_user(&state, &headers).await?;

    let mut imported = 0u64;
    let mut skipped = 0u64;
    for (index, line) in body.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        // Tolerate the header row our own export writes.
        if index == 0 && line.eq_ignore_ascii_case("date,weight_kg") {
            continue;
        }
        let Some((date_part, weight_part)) = line.split_once(',') else {
            skipped += 1;
            continue;
        };
        let Ok(date) = NaiveDate::parse_from_str(date_part.trim(), CSV_DATE_FORMAT) else {
            skipped += 1;
            continue;
        };
        let Ok(weight_kg) = weight_part.trim().parse::<f64>() else {
            skipped += 1;
            continue;
        };
        let Ok(weight_kg) = validate_weight(weight_kg) else {
            skipped += 1;
            continue;
        };

        sqlx::query("INSERT INTO measurements (date, weight_kg, user_id) VALUES (?, ?, ?)")
            .bind(date)
            .bind(weight_kg)
            .bind(user_id)
            .execute(&state.pool)
            .await?;
        imported += 1;
    }
    info!(user_id, imported, skipped, "csv import finished");

    Ok(Json(json!({ "imported": imported, "skipped": skipped })))
}
