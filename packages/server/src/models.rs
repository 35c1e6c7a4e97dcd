//! Database row types.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub daily_kcal_goal: Option<i64>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Measurement {
    pub id: i64,
    pub date: NaiveDate,
    pub weight_kg: f64,
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Meal {
    pub id: i64,
    pub date: NaiveDate,
    pub name: String,
    pub kcal: i64,
    pub user_id: i64,
}
