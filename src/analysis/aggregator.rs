//! Histogram accumulation and normalization.
//!
//! Radial and angular profiles are summed bin by bin. The 2D samples of
//! each file are re-binned into a dense polar grid, then all three
//! accumulators are normalized independently.

use crate::error::{HistogramError, Result};
use crate::models::{
    AccumulatedHistogram, BinningMode, FileDiagnostic, HistogramFile, HistogramLayout, PolarEdges,
    PolarGrid,
};
use crate::parser::parse_histogram_file;
use std::path::Path;
use tracing::debug;

/// Running sums over a sequence of histogram files.
#[derive(Debug, Clone)]
pub struct Accumulator {
    layout: HistogramLayout,
    mode: BinningMode,
    radial_axis: Vec<f64>,
    angular_axis: Vec<f64>,
    radial_sum: Vec<f64>,
    angular_sum: Vec<f64>,
    grid: PolarGrid,
    /// Edges used for the most recent file.
    edges: Option<PolarEdges>,
    diagnostics: Vec<FileDiagnostic>,
    dropped_samples: usize,
}

impl Accumulator {
    pub fn new(layout: HistogramLayout, mode: BinningMode) -> Self {
        Self {
            layout,
            mode,
            radial_axis: Vec::new(),
            angular_axis: Vec::new(),
            radial_sum: vec![0.0; layout.nr],
            angular_sum: vec![0.0; layout.nth],
            grid: PolarGrid::zeros(layout.nr, layout.nth),
            edges: None,
            diagnostics: Vec::new(),
            dropped_samples: 0,
        }
    }

    /// Number of files added so far.
    #[allow(dead_code)] // Utility accessor
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Add one parsed file to the running sums.
    pub fn add(&mut self, file: &HistogramFile) {
        if self.is_empty() {
            self.radial_axis = file.radial.iter().map(|b| b.center).collect();
            self.angular_axis = file.angular.iter().map(|b| b.center).collect();
        }

        add_counts(&mut self.radial_sum, file.radial.iter().map(|b| b.count));
        add_counts(&mut self.angular_sum, file.angular.iter().map(|b| b.count));

        let edges = match (self.mode, self.edges.take()) {
            (BinningMode::FirstFile, Some(fixed)) => fixed,
            _ => PolarEdges::for_extent(file.max_radius(), self.layout.nr, self.layout.nth),
        };

        let dropped = bin_samples(&mut self.grid, &edges, file);
        if dropped > 0 {
            debug!(
                "{}: dropped {} samples outside r < {:.6}",
                file.file_name(),
                dropped,
                edges.extent()
            );
        }

        self.dropped_samples += dropped;
        self.edges = Some(edges);
        self.diagnostics.push(file.diagnostic());
    }

    /// Normalize the accumulators and return the final result.
    pub fn finish(self) -> Result<AccumulatedHistogram> {
        let edges = self.edges.ok_or(HistogramError::NoInput)?;

        let mut radial = self.radial_sum;
        let mut angular = self.angular_sum;
        let mut grid = self.grid;

        normalize(&mut radial);
        normalize(&mut angular);
        normalize(grid.values_mut());

        Ok(AccumulatedHistogram {
            layout: self.layout,
            binning: self.mode,
            radial_axis: self.radial_axis,
            angular_axis: self.angular_axis,
            radial,
            angular,
            grid,
            edges,
            diagnostics: self.diagnostics,
            dropped_samples: self.dropped_samples,
        })
    }
}

/// Parse every file in order and accumulate them.
///
/// The first parse error aborts the whole aggregation.
#[allow(dead_code)] // Batch alternative to driving an Accumulator
pub fn accumulate_files<P: AsRef<Path>>(
    paths: &[P],
    layout: &HistogramLayout,
    mode: BinningMode,
) -> Result<AccumulatedHistogram> {
    let mut accumulator = Accumulator::new(*layout, mode);

    for path in paths {
        let file = parse_histogram_file(path.as_ref(), layout)?;
        accumulator.add(&file);
    }

    accumulator.finish()
}

/// Divide every value by the total. A zero total yields NaN.
pub fn normalize(values: &mut [f64]) {
    let total: f64 = values.iter().sum();
    for value in values.iter_mut() {
        *value /= total;
    }
}

fn add_counts(sum: &mut [f64], counts: impl Iterator<Item = f64>) {
    for (slot, count) in sum.iter_mut().zip(counts) {
        *slot += count;
    }
}

/// Add each in-range sample to its grid cell. Returns the number dropped.
fn bin_samples(grid: &mut PolarGrid, edges: &PolarEdges, file: &HistogramFile) -> usize {
    let mut dropped = 0;

    for sample in &file.samples {
        let cell = edges
            .locate(sample.r, sample.theta)
            .filter(|&(ir, ith)| ir < grid.nr() && ith < grid.nth());

        match cell {
            Some((ir, ith)) => grid.add(ir, ith, sample.count),
            None => dropped += 1,
        }
    }

    dropped
}
