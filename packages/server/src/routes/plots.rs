//! SVG chart endpoints.

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::auth::require_user;
use crate::error::AppResult;
use crate::models::Measurement;
use crate::state::AppState;
use crate::stats::{compute_weekly_changes, filter_by_periods, is_truthy};

const SVG_CONTENT_TYPE: &str = "image/svg+xml";

#[derive(Debug, Deserialize, Default)]
pub struct PlotParams {
    pub periods: Option<String>,
    /// Overlay a rolling-mean trend line when truthy.
    pub trend: Option<String>,
}

async fn filtered_measurements(
    state: &AppState,
    user_id: i64,
    periods: Option<&str>,
) -> AppResult<Vec<Measurement>> {
    let rows: Vec<Measurement> =
        sqlx::query_as("SELECT * FROM measurements WHERE user_id = ? ORDER BY date")
            .bind(user_id)
            .fetch_all(&state.pool)
            .await?;
    Ok(match periods {
        Some(spec) => filter_by_periods(rows, spec),
        None => rows,
    })
}

pub async fn weight_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PlotParams>,
) -> AppResult<Response> {
    let user_id = require_user(&state, &headers).await?;
    let measurements =
        filtered_measurements(&state, user_id, params.periods.as_deref()).await?;

    let points: Vec<_> = measurements
        .iter()
        .map(|m| (m.date, m.weight_kg))
        .collect();
    let trend = params.trend.as_deref().is_some_and(is_truthy);

    let svg = state.charts.weight_history(&points, trend).await?;
    Ok(([(header::CONTENT_TYPE, SVG_CONTENT_TYPE)], svg).into_response())
}

pub async fn weekly_changes(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PlotParams>,
) -> AppResult<Response> {
    let user_id = require_user(&state, &headers).await?;
    let measurements =
        filtered_measurements(&state, user_id, params.periods.as_deref()).await?;

    let rates: Vec<f64> = compute_weekly_changes(&measurements)
        .into_iter()
        .map(|c| c.kg_per_week)
        .collect();

    let svg = state.charts.weekly_histogram(&rates).await?;
    Ok(([(header::CONTENT_TYPE, SVG_CONTENT_TYPE)], svg).into_response())
}
