//! JSON summary of an aggregation run.

use crate::models::{AccumulatedHistogram, BinningMode, FileDiagnostic, HistogramLayout};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Machine-readable counterpart of the figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub input_dir: String,
    pub layout: HistogramLayout,
    pub binning: BinningMode,
    pub files: Vec<FileDiagnostic>,
    pub dropped_samples: usize,
    /// Outer radius of the 2D grid.
    pub extent: f64,
    /// `[center, value]` pairs of the normalized radial profile.
    pub radial: Vec<(f64, f64)>,
    /// `[center, value]` pairs of the normalized angular profile (radians).
    pub angular: Vec<(f64, f64)>,
    /// Normalized grid rows, indexed by radial bin.
    pub grid: Vec<Vec<f64>>,
}

impl RunSummary {
    pub fn from_histogram(histogram: &AccumulatedHistogram, input_dir: &Path) -> Self {
        Self {
            generated_at: Utc::now(),
            input_dir: input_dir.display().to_string(),
            layout: histogram.layout,
            binning: histogram.binning,
            files: histogram.diagnostics.clone(),
            dropped_samples: histogram.dropped_samples,
            extent: histogram.edges.extent(),
            radial: pairs(&histogram.radial_axis, &histogram.radial),
            angular: pairs(&histogram.angular_axis, &histogram.angular),
            grid: histogram.grid.rows().map(<[f64]>::to_vec).collect(),
        }
    }
}

fn pairs(axis: &[f64], values: &[f64]) -> Vec<(f64, f64)> {
    axis.iter().copied().zip(values.iter().copied()).collect()
}

/// Serialize a summary as pretty JSON. NaN values become `null`.
pub fn generate_json_summary(summary: &RunSummary) -> Result<String> {
    serde_json::to_string_pretty(summary).map_err(Into::into)
}

/// Write a JSON summary to a file.
pub fn write_json_summary(summary: &RunSummary, path: &Path) -> Result<()> {
    let content = generate_json_summary(summary)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write summary to {}", path.display()))
}
