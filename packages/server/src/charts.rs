//! SVG chart rendering with plotters.
//!
//! Rendering is CPU-bound and allocation-heavy, so a single mutex
//! serializes all chart work; concurrent requests queue instead of
//! stacking up rasterization buffers.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use plotters::prelude::*;
use tokio::sync::Mutex;

const ORANGE: RGBColor = RGBColor(255, 165, 0);
const WIDTH: u32 = 1000;
const HEIGHT: u32 = 500;
const HISTOGRAM_BINS: usize = 16;

/// Renders weight charts as SVG, one at a time.
pub struct ChartService {
    render_lock: Mutex<()>,
}

impl ChartService {
    pub fn new() -> Self {
        Self {
            render_lock: Mutex::new(()),
        }
    }

    /// Weight over time as a line chart, with an optional 5-point
    /// rolling-mean trend line.
    pub async fn weight_history(
        &self,
        points: &[(NaiveDate, f64)],
        trend: bool,
    ) -> Result<String> {
        let _guard = self.render_lock.lock().await;
        render_weight_history(points, trend)
    }

    /// Histogram of weekly change rates.
    pub async fn weekly_histogram(&self, rates: &[f64]) -> Result<String> {
        let _guard = self.render_lock.lock().await;
        render_weekly_histogram(rates)
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

fn empty_chart(message: &str) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow!("{e}"))?;
        root.draw(&Text::new(
            message.to_string(),
            (WIDTH as i32 / 2 - 120, HEIGHT as i32 / 2),
            ("sans-serif", 40).into_font(),
        ))
        .map_err(|e| anyhow!("{e}"))?;
        root.present().map_err(|e| anyhow!("{e}"))?;
    }
    Ok(svg)
}

fn render_weight_history(points: &[(NaiveDate, f64)], trend: bool) -> Result<String> {
    if points.is_empty() {
        return empty_chart("Brak danych");
    }

    let mut sorted: Vec<(NaiveDate, f64)> = points.to_vec();
    sorted.sort_by_key(|(date, _)| *date);

    let first = sorted[0].0;
    // Plot against day offsets so the x-range stays numeric.
    let xs: Vec<(f64, f64)> = sorted
        .iter()
        .map(|(date, kg)| ((*date - first).num_days() as f64, *kg))
        .collect();

    let x_max = xs.last().map(|(x, _)| *x).unwrap_or(0.0).max(1.0);
    let (mut y_min, mut y_max) = xs
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), (_, y)| {
            (lo.min(*y), hi.max(*y))
        });
    if (y_max - y_min).abs() < f64::EPSILON {
        y_min -= 1.0;
        y_max += 1.0;
    }
    let pad = (y_max - y_min) * 0.1;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow!("{e}"))?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Przebieg masy ciała", ("sans-serif", 30))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0.0..x_max, (y_min - pad)..(y_max + pad))
            .map_err(|e| anyhow!("{e}"))?;

        chart
            .configure_mesh()
            .x_label_formatter(&|days| {
                let date = first + chrono::Duration::days(*days as i64);
                date.format("%d/%m/%Y").to_string()
            })
            .y_desc("kg")
            .draw()
            .map_err(|e| anyhow!("{e}"))?;

        chart
            .draw_series(LineSeries::new(xs.iter().copied(), &BLUE))
            .map_err(|e| anyhow!("{e}"))?;
        chart
            .draw_series(
                xs.iter()
                    .map(|(x, y)| Circle::new((*x, *y), 3, BLUE.filled())),
            )
            .map_err(|e| anyhow!("{e}"))?;

        if trend && xs.len() >= 5 {
            let smoothed: Vec<(f64, f64)> = (2..xs.len() - 2)
                .map(|i| {
                    let mean = xs[i - 2..=i + 2].iter().map(|(_, y)| y).sum::<f64>() / 5.0;
                    (xs[i].0, mean)
                })
                .collect();
            chart
                .draw_series(LineSeries::new(
                    smoothed,
                    ORANGE.stroke_width(3),
                ))
                .map_err(|e| anyhow!("{e}"))?;
        }

        root.present().map_err(|e| anyhow!("{e}"))?;
    }
    Ok(svg)
}

fn render_weekly_histogram(rates: &[f64]) -> Result<String> {
    if rates.is_empty() {
        return empty_chart("Brak danych");
    }

    let lo = rates.iter().copied().fold(f64::MAX, f64::min);
    let hi = rates.iter().copied().fold(f64::MIN, f64::max);
    let span = if (hi - lo).abs() < f64::EPSILON {
        1.0
    } else {
        hi - lo
    };
    let bin_width = span / HISTOGRAM_BINS as f64;

    let mut counts = [0usize; HISTOGRAM_BINS];
    for &rate in rates {
        let idx = (((rate - lo) / bin_width) as usize).min(HISTOGRAM_BINS - 1);
        counts[idx] += 1;
    }
    let max_count = counts.iter().copied().max().unwrap_or(1).max(1);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow!("{e}"))?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Histogram tygodniowych zmian masy", ("sans-serif", 30))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(lo..(lo + span), 0.0..(max_count as f64 * 1.1))
            .map_err(|e| anyhow!("{e}"))?;

        chart
            .configure_mesh()
            .x_desc("kg / tydzień")
            .y_desc("liczba tygodni")
            .draw()
            .map_err(|e| anyhow!("{e}"))?;

        chart
            .draw_series(counts.iter().enumerate().map(|(i, &count)| {
                let x0 = lo + bin_width * i as f64;
                let x1 = x0 + bin_width;
                Rectangle::new([(x0, 0.0), (x1, count as f64)], BLUE.filled())
            }))
            .map_err(|e| anyhow!("{e}"))?;

        root.present().map_err(|e| anyhow!("{e}"))?;
    }
    Ok(svg)
}
