//! WeightTracker server core.
//!
//! Users record body-weight measurements and daily meals, view trend
//! charts, and look up tips, recipes and calorie data through the
//! [`scout`] pipelines. Storage is a single SQLite database; sessions
//! live in process memory.

pub mod app;
pub mod auth;
pub mod charts;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod stats;

pub use app::build_app;
pub use state::AppState;
