//! Weight statistics: weekly change rates and period filtering.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::Measurement;

/// Rate of change between two consecutive measurements, scaled to a week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyChange {
    pub date: NaiveDate,
    pub kg_per_week: f64,
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Weekly change rates from a measurement history.
///
/// Measurements are sorted by date first. Each consecutive pair yields
/// one point dated at the later measurement; same-day duplicates are
/// skipped because the elapsed time is zero.
pub fn compute_weekly_changes(measurements: &[Measurement]) -> Vec<WeeklyChange> {
    let mut sorted: Vec<&Measurement> = measurements.iter().collect();
    sorted.sort_by_key(|m| m.date);

    let mut changes = Vec::new();
    for pair in sorted.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        let delta_days = (next.date - prev.date).num_days();
        if delta_days <= 0 {
            continue;
        }
        let per_week = (next.weight_kg - prev.weight_kg) / delta_days as f64 * 7.0;
        changes.push(WeeklyChange {
            date: next.date,
            kg_per_week: round3(per_week),
        });
    }
    changes
}

/// One parsed period filter token.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Period {
    Year(i32),
    Month(i32, u32),
    Quarter(i32, u32),
    Half(i32, u32),
}

impl Period {
    fn parse(token: &str) -> Option<Period> {
        let token = token.trim().to_uppercase();
        if token.len() == 4 && token.chars().all(|c| c.is_ascii_digit()) {
            return Some(Period::Year(token.parse().ok()?));
        }

        // Checked slicing: multi-byte input must fall through to None,
        // never panic on a char boundary.
        let year: i32 = token.get(..4)?.parse().ok()?;
        let tail: u32 = token.get(5..)?.parse().ok()?;
        match (token.len(), token.as_bytes().get(4)) {
            (7, Some(b'-')) if (1..=12).contains(&tail) => Some(Period::Month(year, tail)),
            (6, Some(b'Q')) if (1..=4).contains(&tail) => Some(Period::Quarter(year, tail)),
            (6, Some(b'H')) if (1..=2).contains(&tail) => Some(Period::Half(year, tail)),
            _ => None,
        }
    }

    fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Period::Year(y) => date.year() == y,
            Period::Month(y, m) => date.year() == y && date.month() == m,
            Period::Quarter(y, q) => {
                let start = (q - 1) * 3 + 1;
                date.year() == y && (start..start + 3).contains(&date.month())
            }
            Period::Half(y, h) => {
                let start = (h - 1) * 6 + 1;
                date.year() == y && (start..start + 6).contains(&date.month())
            }
        }
    }
}

/// Keep only measurements falling in any of the comma-separated periods.
///
/// Accepted forms: `2024`, `2024-03`, `2024Q2`, `2024H1`. Unparseable
/// tokens are ignored; when nothing parses the input passes unfiltered.
pub fn filter_by_periods(measurements: Vec<Measurement>, spec: &str) -> Vec<Measurement> {
    let periods: Vec<Period> = spec.split(',').filter_map(Period::parse).collect();
    if periods.is_empty() {
        return measurements;
    }
    measurements
        .into_iter()
        .filter(|m| periods.iter().any(|p| p.contains(m.date)))
        .collect()
}

/// Loose boolean parsing for query parameters.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
