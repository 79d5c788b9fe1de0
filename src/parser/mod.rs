//! Positional parser for `histo_*.dat` files.
//!
//! A file is a flat list of whitespace-separated numbers. After comments
//! and blank lines are dropped, the first `nr` lines are the radial
//! profile, the next `nth` the angular profile, and everything after that
//! is a list of `(r, theta, count)` triples.

use crate::error::{HistogramError, Result};
use crate::models::{HistogramFile, HistogramLayout, PolarSample, ProfileBin};
use std::fs;
use std::path::Path;
use tracing::info;

/// A data line together with its 1-based line number in the source.
struct DataLine<'a> {
    number: usize,
    text: &'a str,
}

/// Read and parse one histogram file.
pub fn parse_histogram_file(path: &Path, layout: &HistogramLayout) -> Result<HistogramFile> {
    let content = fs::read_to_string(path).map_err(|source| HistogramError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let histogram = parse_histogram_str(path, &content, layout)?;
    info!("{}", histogram.diagnostic());

    Ok(histogram)
}

/// Parse histogram content already loaded in memory.
///
/// `source` is only used to label errors and the resulting file.
pub fn parse_histogram_str(
    source: &Path,
    content: &str,
    layout: &HistogramLayout,
) -> Result<HistogramFile> {
    let lines = data_lines(content, layout.comment_marker);

    if lines.len() < layout.profile_lines() {
        return Err(HistogramError::TooFewLines {
            path: source.to_path_buf(),
            expected: layout.profile_lines(),
            found: lines.len(),
        });
    }

    let (radial_lines, rest) = lines.split_at(layout.nr);
    let (angular_lines, sample_lines) = rest.split_at(layout.nth);

    let radial = radial_lines
        .iter()
        .map(|line| parse_fields::<2>(source, line).map(profile_bin))
        .collect::<Result<Vec<_>>>()?;

    let angular = angular_lines
        .iter()
        .map(|line| parse_fields::<2>(source, line).map(profile_bin))
        .collect::<Result<Vec<_>>>()?;

    let samples = sample_lines
        .iter()
        .map(|line| {
            parse_fields::<3>(source, line).map(|[r, theta, count]| PolarSample { r, theta, count })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(HistogramFile {
        source: source.to_path_buf(),
        radial,
        angular,
        samples,
    })
}

fn profile_bin([center, count]: [f64; 2]) -> ProfileBin {
    ProfileBin { center, count }
}

/// Trimmed, non-empty, non-comment lines in file order.
fn data_lines(content: &str, comment_marker: char) -> Vec<DataLine<'_>> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| DataLine {
            number: i + 1,
            text: line.trim(),
        })
        .filter(|line| !line.text.is_empty() && !line.text.starts_with(comment_marker))
        .collect()
}

/// Split a line into exactly `N` floats.
fn parse_fields<const N: usize>(source: &Path, line: &DataLine<'_>) -> Result<[f64; N]> {
    let tokens: Vec<&str> = line.text.split_whitespace().collect();
    if tokens.len() != N {
        return Err(HistogramError::FieldCount {
            path: source.to_path_buf(),
            line: line.number,
            expected: N,
            found: tokens.len(),
        });
    }

    let mut values = [0.0; N];
    for (slot, token) in values.iter_mut().zip(tokens) {
        *slot = token
            .parse::<f64>()
            .map_err(|_| HistogramError::InvalidNumber {
                path: source.to_path_buf(),
                line: line.number,
                token: token.to_string(),
            })?;
    }

    Ok(values)
}
