//! Transient response charts
//!
//! Fetches `[theory, experimental, residuals]` and turns it into the two
//! tables the dashboard draws.

use crate::backend::Backend;
use crate::backend::error::BackendError;
use crate::error_classifier::ErrorClassifier;
use crate::events::{EventSender, EventType, Source};
use crate::logging::LogLevel;
use crate::models::TransientResponse;
use log::debug;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseRow {
    pub time: f64,
    pub experimental: f64,
    pub theoretical: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidualRow {
    pub time: f64,
    pub residual: f64,
}

/// Rows for the response chart and the residual chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartTables {
    pub response: Vec<ResponseRow>,
    pub residuals: Vec<ResidualRow>,
}

impl ChartTables {
    /// Walks the theory keys in order. Steps missing from the other two series become NaN.
    pub fn from_response(data: &TransientResponse) -> Self {
        let mut response = Vec::with_capacity(data.theory().len());
        let mut residuals = Vec::with_capacity(data.theory().len());

        for (key, theoretical) in data.theory().iter() {
            let time = key.trim().parse::<f64>().unwrap_or(f64::NAN);
            response.push(ResponseRow {
                time,
                experimental: data.experimental().get(key).unwrap_or(f64::NAN),
                theoretical,
            });
            residuals.push(ResidualRow {
                time,
                residual: data.residuals().get(key).unwrap_or(f64::NAN),
            });
        }

        Self {
            response,
            residuals,
        }
    }

    /// Unbroken runs of `(time, experimental)` points. A missing step ends a run.
    pub fn experimental_segments(&self) -> Vec<Vec<(f64, f64)>> {
        split_at_gaps(self.response.iter().map(|r| (r.time, r.experimental)))
    }

    /// Unbroken runs of `(time, theoretical)` points.
    pub fn theoretical_segments(&self) -> Vec<Vec<(f64, f64)>> {
        split_at_gaps(self.response.iter().map(|r| (r.time, r.theoretical)))
    }

    /// Unbroken runs of `(time, residual)` points.
    pub fn residual_segments(&self) -> Vec<Vec<(f64, f64)>> {
        split_at_gaps(self.residuals.iter().map(|r| (r.time, r.residual)))
    }

    /// Root-mean-square of the finite residuals.
    pub fn residual_rms(&self) -> Option<f64> {
        let finite: Vec<f64> = self
            .residuals
            .iter()
            .map(|r| r.residual)
            .filter(|v| v.is_finite())
            .collect();
        if finite.is_empty() {
            return None;
        }
        let mean_square = finite.iter().map(|v| v * v).sum::<f64>() / finite.len() as f64;
        Some(mean_square.sqrt())
    }
}

fn split_at_gaps(points: impl Iterator<Item = (f64, f64)>) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (x, y) in points {
        if x.is_finite() && y.is_finite() {
            current.push((x, y));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// `[min, max]` over the given points' coordinate, padded when flat.
pub fn bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    if (max - min).abs() < f64::EPSILON {
        return [min - 0.5, max + 0.5];
    }
    [min, max]
}

/// Display lifecycle of the charts: drawn once, never refreshed.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ChartState {
    #[default]
    NotLoaded,
    Loaded(Box<ChartTables>),
    Failed(String),
}

#[derive(Clone)]
pub struct ChartRenderer {
    backend: Arc<dyn Backend>,
    events: EventSender,
}

impl ChartRenderer {
    pub fn new(backend: Arc<dyn Backend>, events: EventSender) -> Self {
        Self { backend, events }
    }

    /// Fetches the dataset and builds both tables.
    pub async fn draw_chart(&self) -> Result<ChartTables, BackendError> {
        match self.backend.chart_data().await {
            Ok(data) => {
                if data.theory().is_empty() {
                    debug!("chart data has no theory steps, drawing empty charts");
                }
                let tables = ChartTables::from_response(&data);
                self.events
                    .send(
                        Source::ChartRenderer,
                        format!("Loaded {} chart rows", tables.response.len()),
                        EventType::Success,
                        LogLevel::Info,
                    )
                    .await;
                Ok(tables)
            }
            Err(e) => {
                self.events
                    .send(
                        Source::ChartRenderer,
                        format!("Failed to load chart data: {}", e),
                        EventType::Error,
                        ErrorClassifier::new().classify(&e),
                    )
                    .await;
                Err(e)
            }
        }
    }
}
