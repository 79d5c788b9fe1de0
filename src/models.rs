//! Data models for histogram aggregation.
//!
//! This module contains the core data structures used throughout
//! the application for representing parsed histogram files, the
//! accumulated grid, and the aggregated result.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Positional layout of a histogram file.
///
/// Files carry no header, so the number of radial and angular lines
/// has to be supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramLayout {
    /// Number of radial bins (lines in the radial block).
    pub nr: usize,
    /// Number of angular bins (lines in the angular block).
    pub nth: usize,
    /// Lines starting with this character are ignored.
    pub comment_marker: char,
}

impl Default for HistogramLayout {
    fn default() -> Self {
        Self {
            nr: 50,
            nth: 72,
            comment_marker: '#',
        }
    }
}

impl HistogramLayout {
    #[allow(dead_code)] // Used by tests and callers with non-default bins
    pub fn new(nr: usize, nth: usize) -> Self {
        Self {
            nr,
            nth,
            ..Self::default()
        }
    }

    /// Minimum number of data lines a file must contain.
    pub fn profile_lines(&self) -> usize {
        self.nr + self.nth
    }
}

/// How 2D bin edges are chosen across files.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum BinningMode {
    /// Recompute edges from each file's own radial extent
    #[default]
    PerFile,
    /// Compute edges once from the first file and reuse them
    FirstFile,
}

impl fmt::Display for BinningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinningMode::PerFile => write!(f, "per-file"),
            BinningMode::FirstFile => write!(f, "first-file"),
        }
    }
}

/// One bin of a 1D profile: its center and the count recorded there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileBin {
    pub center: f64,
    pub count: f64,
}

/// A raw 2D contribution at polar coordinates `(r, theta)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarSample {
    pub r: f64,
    /// Angle in radians, expected within `[-π, π)`.
    pub theta: f64,
    pub count: f64,
}

/// A single parsed `histo_*.dat` file.
#[derive(Debug, Clone)]
pub struct HistogramFile {
    /// Path the data was read from.
    pub source: PathBuf,
    /// Radial marginal, one entry per radial bin.
    pub radial: Vec<ProfileBin>,
    /// Angular marginal, one entry per angular bin.
    pub angular: Vec<ProfileBin>,
    /// Remaining `(r, theta, count)` triples.
    pub samples: Vec<PolarSample>,
}

impl HistogramFile {
    pub fn radial_total(&self) -> f64 {
        self.radial.iter().map(|b| b.count).sum()
    }

    pub fn angular_total(&self) -> f64 {
        self.angular.iter().map(|b| b.count).sum()
    }

    pub fn samples_total(&self) -> f64 {
        self.samples.iter().map(|s| s.count).sum()
    }

    /// Center of the outermost radial bin, which sets the 2D extent.
    pub fn max_radius(&self) -> f64 {
        self.radial.last().map(|b| b.center).unwrap_or(0.0)
    }

    /// File name used in diagnostics.
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.source.display().to_string())
    }

    pub fn diagnostic(&self) -> FileDiagnostic {
        FileDiagnostic {
            file: self.file_name(),
            radial_total: self.radial_total(),
            angular_total: self.angular_total(),
            samples_total: self.samples_total(),
        }
    }
}

/// Per-file sanity totals, logged once per file and kept for the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDiagnostic {
    pub file: String,
    pub radial_total: f64,
    pub angular_total: f64,
    pub samples_total: f64,
}

impl fmt::Display for FileDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -- r_counts: {}, th_counts: {}, c2d: {}",
            self.file, self.radial_total, self.angular_total, self.samples_total
        )
    }
}

/// Dense `nr × nth` grid stored row-major (radial index major).
#[derive(Debug, Clone, PartialEq)]
pub struct PolarGrid {
    nr: usize,
    nth: usize,
    cells: Vec<f64>,
}

impl PolarGrid {
    pub fn zeros(nr: usize, nth: usize) -> Self {
        Self {
            nr,
            nth,
            cells: vec![0.0; nr * nth],
        }
    }

    pub fn nr(&self) -> usize {
        self.nr
    }

    pub fn nth(&self) -> usize {
        self.nth
    }

    pub fn get(&self, ir: usize, ith: usize) -> f64 {
        self.cells[ir * self.nth + ith]
    }

    pub fn add(&mut self, ir: usize, ith: usize, value: f64) {
        self.cells[ir * self.nth + ith] += value;
    }

    #[allow(dead_code)] // Utility for diagnostics
    pub fn total(&self) -> f64 {
        self.cells.iter().sum()
    }

    /// Largest finite cell value, or 0 if there is none.
    pub fn max_finite(&self) -> f64 {
        self.cells
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }

    pub fn values(&self) -> &[f64] {
        &self.cells
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.cells
    }

    /// Rows indexed by radial bin.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks(self.nth.max(1))
    }
}

/// Bin edges of the 2D polar grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarEdges {
    /// `nr + 1` edges over `[0, R]`.
    pub radial: Vec<f64>,
    /// `nth + 1` edges over `[-π, π]`.
    pub angular: Vec<f64>,
}

impl PolarEdges {
    /// Outer radius `R` of the grid.
    pub fn extent(&self) -> f64 {
        self.radial.last().copied().unwrap_or(0.0)
    }
}

/// Sum of all files, normalized and ready to plot.
#[derive(Debug, Clone)]
pub struct AccumulatedHistogram {
    pub layout: HistogramLayout,
    pub binning: BinningMode,
    /// Radial bin centers taken from the first file.
    pub radial_axis: Vec<f64>,
    /// Angular bin centers (radians) taken from the first file.
    pub angular_axis: Vec<f64>,
    /// Normalized radial profile.
    pub radial: Vec<f64>,
    /// Normalized angular profile.
    pub angular: Vec<f64>,
    /// Normalized 2D grid.
    pub grid: PolarGrid,
    /// Edges of the last binning step, used to place heatmap cells.
    pub edges: PolarEdges,
    pub diagnostics: Vec<FileDiagnostic>,
    /// 2D samples that fell outside the grid.
    pub dropped_samples: usize,
}

impl AccumulatedHistogram {
    pub fn files_processed(&self) -> usize {
        self.diagnostics.len()
    }

    /// Names of the accumulators whose normalization produced non-finite values.
    pub fn degenerate_components(&self) -> Vec<&'static str> {
        let mut components = Vec::new();
        if self.radial.iter().any(|v| !v.is_finite()) {
            components.push("radial");
        }
        if self.angular.iter().any(|v| !v.is_finite()) {
            components.push("angular");
        }
        if self.grid.values().iter().any(|v| !v.is_finite()) {
            components.push("2d");
        }
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bins(values: &[(f64, f64)]) -> Vec<ProfileBin> {
        values
            .iter()
            .map(|&(center, count)| ProfileBin { center, count })
            .collect()
    }

    #[test]
    fn test_default_layout() {
        let layout = HistogramLayout::default();
        assert_eq!(layout.nr, 50);
        assert_eq!(layout.nth, 72);
        assert_eq!(layout.comment_marker, '#');
        assert_eq!(layout.profile_lines(), 122);
    }

    #[test]
    fn test_histogram_file_totals() {
        let file = HistogramFile {
            source: PathBuf::from("/data/run/histo_003.dat"),
            radial: bins(&[(0.01, 2.0), (0.03, 3.0)]),
            angular: bins(&[(-1.0, 4.0), (1.0, 1.0)]),
            samples: vec![
                PolarSample { r: 0.01, theta: 0.5, count: 1.5 },
                PolarSample { r: 0.03, theta: -0.5, count: 0.5 },
            ],
        };

        assert_eq!(file.radial_total(), 5.0);
        assert_eq!(file.angular_total(), 5.0);
        assert_eq!(file.samples_total(), 2.0);
        assert_eq!(file.max_radius(), 0.03);
        assert_eq!(file.file_name(), "histo_003.dat");
        assert_eq!(
            file.diagnostic().to_string(),
            "histo_003.dat -- r_counts: 5, th_counts: 5, c2d: 2"
        );
    }

    #[test]
    fn test_polar_grid_indexing() {
        let mut grid = PolarGrid::zeros(2, 3);
        grid.add(1, 2, 4.0);
        grid.add(0, 1, 1.0);
        grid.add(1, 2, 1.0);

        assert_eq!(grid.get(1, 2), 5.0);
        assert_eq!(grid.get(0, 1), 1.0);
        assert_eq!(grid.total(), 6.0);
        assert_eq!(grid.max_finite(), 5.0);

        let rows: Vec<&[f64]> = grid.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], &[0.0, 0.0, 5.0]);
    }

    #[test]
    fn test_binning_mode_serde() {
        let mode: BinningMode = serde_json::from_str("\"first-file\"").unwrap();
        assert_eq!(mode, BinningMode::FirstFile);
        assert_eq!(BinningMode::default().to_string(), "per-file");
    }
}
