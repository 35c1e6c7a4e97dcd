//! HTTP handlers, one module per resource.

pub mod auth;
pub mod health;
pub mod kcal;
pub mod meals;
pub mod measurements;
pub mod plots;
pub mod recipes;
pub mod tips;
