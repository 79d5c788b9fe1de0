//! Bin edge construction and lookup for the 2D polar grid.

use crate::models::PolarEdges;
use std::f64::consts::PI;

/// `n` evenly spaced points from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut points: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            // Pin the endpoint so the outer edge is exact.
            points[n - 1] = end;
            points
        }
    }
}

/// Index of the bin containing `value`, using the largest edge `<= value`.
///
/// Bins are closed on the lower edge and open on the upper one. Values
/// below the first edge, at or beyond the last edge, or NaN return `None`.
pub fn bin_index(edges: &[f64], value: f64) -> Option<usize> {
    let at_or_below = edges.partition_point(|&edge| edge <= value);
    let index = at_or_below.checked_sub(1)?;
    (index + 1 < edges.len()).then_some(index)
}

impl PolarEdges {
    /// Edges for a grid whose outermost radial bin center is `max_radius`.
    ///
    /// The outer radius is pushed half a bin past that center:
    /// `R = max_radius * (nr + 0.5) / nr`.
    pub fn for_extent(max_radius: f64, nr: usize, nth: usize) -> Self {
        let extent = if nr == 0 {
            0.0
        } else {
            max_radius * (nr as f64 + 0.5) / nr as f64
        };

        Self {
            radial: linspace(0.0, extent, nr + 1),
            angular: linspace(-PI, PI, nth + 1),
        }
    }

    /// Grid cell for a polar coordinate, if it falls inside the grid.
    pub fn locate(&self, r: f64, theta: f64) -> Option<(usize, usize)> {
        Some((bin_index(&self.radial, r)?, bin_index(&self.angular, theta)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints() {
        let points = linspace(0.0, 1.0, 5);
        assert_eq!(points, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(-PI, PI, 73)[72], PI);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_value_on_lower_edge_belongs_to_that_bin() {
        let edges = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(bin_index(&edges, 0.0), Some(0));
        assert_eq!(bin_index(&edges, 1.0), Some(1));
        assert_eq!(bin_index(&edges, 2.0), Some(2));
        assert_eq!(bin_index(&edges, 2.999), Some(2));
    }

    #[test]
    fn test_out_of_range_values() {
        let edges = [0.0, 1.0, 2.0];
        assert_eq!(bin_index(&edges, -0.1), None);
        assert_eq!(bin_index(&edges, 2.0), None);
        assert_eq!(bin_index(&edges, 10.0), None);
        assert_eq!(bin_index(&edges, f64::NAN), None);
        assert_eq!(bin_index(&[], 0.5), None);
    }

    #[test]
    fn test_polar_edges_extent() {
        let edges = PolarEdges::for_extent(0.5, 50, 72);
        assert_eq!(edges.radial.len(), 51);
        assert_eq!(edges.angular.len(), 73);
        assert!((edges.extent() - 0.505).abs() < 1e-12);
        assert_eq!(edges.angular[0], -PI);
        assert_eq!(edges.angular[72], PI);
    }

    #[test]
    fn test_locate_drops_radius_beyond_extent() {
        // nr = 2, max center 1.0 -> R = 1.25, edges [0, 0.625, 1.25]
        let edges = PolarEdges::for_extent(1.0, 2, 4);
        assert_eq!(edges.locate(0.625, 0.0), Some((1, 2)));
        assert_eq!(edges.locate(1.2, -PI), Some((1, 0)));
        assert_eq!(edges.locate(1.25, 0.0), None);
        assert_eq!(edges.locate(1.3, 0.0), None);
        assert_eq!(edges.locate(0.1, PI), None);
    }
}
