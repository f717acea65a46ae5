//! Regular latitude/longitude grids.

use serde::{Deserialize, Serialize};
use sitescore_core::Site;

use crate::GridError;

/// Largest grid [`GridSpec::new`] accepts.
pub const MAX_GRID_POINTS: usize = 10_000_000;

/// A rectangular grid of points spaced `step` degrees apart.
///
/// Each axis is enumerated half-open from its minimum: `min`, `min + step`,
/// and so on while below `max`. Points are ordered latitude-major, with
/// longitude varying fastest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
    step: f64,
}

impl GridSpec {
    /// Describe a grid over the given bounds.
    ///
    /// # Errors
    /// Returns [`GridError`] when a bound is not finite, a minimum is not
    /// below its maximum, a bound lies outside valid coordinates, or the step
    /// is not a positive finite number. Grids with more than
    /// [`MAX_GRID_POINTS`] points are rejected with
    /// [`GridError::TooManyPoints`].
    pub fn new(
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
        step: f64,
    ) -> Result<Self, GridError> {
        for (name, value) in [
            ("min_lat", min_lat),
            ("max_lat", max_lat),
            ("min_lon", min_lon),
            ("max_lon", max_lon),
        ] {
            if !value.is_finite() {
                return Err(GridError::NonFiniteBound { name, value });
            }
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(GridError::InvalidStep { step });
        }
        if min_lat >= max_lat {
            return Err(GridError::InvertedBounds {
                axis: "latitude",
                min: min_lat,
                max: max_lat,
            });
        }
        if min_lon >= max_lon {
            return Err(GridError::InvertedBounds {
                axis: "longitude",
                min: min_lon,
                max: max_lon,
            });
        }
        // Corners must be valid sites; every interior point then is too.
        Site::new(min_lat, min_lon)?;
        Site::new(max_lat, max_lon)?;
        let points = axis_len(min_lat, max_lat, step)
            .zip(axis_len(min_lon, max_lon, step))
            .and_then(|(rows, columns)| rows.checked_mul(columns))
            .filter(|points| *points <= MAX_GRID_POINTS);
        if points.is_none() {
            return Err(GridError::TooManyPoints {
                step,
                limit: MAX_GRID_POINTS,
            });
        }
        Ok(Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
            step,
        })
    }

    /// Spacing between neighbouring points in degrees.
    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// Latitudes of the grid rows, south to north.
    #[must_use]
    pub fn latitudes(&self) -> Vec<f64> {
        axis(self.min_lat, self.max_lat, self.step)
    }

    /// Longitudes of the grid columns, west to east.
    #[must_use]
    pub fn longitudes(&self) -> Vec<f64> {
        axis(self.min_lon, self.max_lon, self.step)
    }

    /// Number of points in the grid.
    #[must_use]
    pub fn len(&self) -> usize {
        self.latitudes()
            .len()
            .saturating_mul(self.longitudes().len())
    }

    /// Report whether the grid has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every grid point, latitude-major.
    ///
    /// # Errors
    /// Returns [`GridError::Site`] if a point is not a valid coordinate.
    pub fn sites(&self) -> Result<Vec<Site>, GridError> {
        let longitudes = self.longitudes();
        let mut sites = Vec::with_capacity(self.len());
        for latitude in self.latitudes() {
            for &longitude in &longitudes {
                sites.push(Site::new(latitude, longitude)?);
            }
        }
        Ok(sites)
    }
}

/// Number of points on a half-open axis, or `None` above [`MAX_GRID_POINTS`].
#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "the count is range-checked before narrowing"
)]
fn axis_len(start: f64, stop: f64, step: f64) -> Option<usize> {
    let count = ((stop - start) / step).ceil().max(0.0);
    (count.is_finite() && count <= MAX_GRID_POINTS as f64).then_some(count as usize)
}

/// Half-open arithmetic progression `start, start + step, ...` below `stop`.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "grid axes are built from degree offsets"
)]
fn axis(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let count = axis_len(start, stop, step).unwrap_or(0);
    (0..count).map(|i| start + i as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn axes_are_half_open() {
        let grid = GridSpec::new(33.0, 33.5, -84.5, -84.0, 0.25).expect("valid grid");
        assert_eq!(grid.latitudes(), vec![33.0, 33.25]);
        assert_eq!(grid.longitudes(), vec![-84.5, -84.25]);
        assert_eq!(grid.len(), 4);
    }

    #[rstest]
    fn partial_steps_include_the_last_point_below_the_maximum() {
        let grid = GridSpec::new(0.0, 1.1, 0.0, 0.5, 0.5).expect("valid grid");
        assert_eq!(grid.latitudes(), vec![0.0, 0.5, 1.0]);
        assert_eq!(grid.longitudes(), vec![0.0]);
    }

    #[rstest]
    fn sites_are_latitude_major() {
        let grid = GridSpec::new(33.0, 33.5, -84.5, -84.0, 0.25).expect("valid grid");
        let coords: Vec<(f64, f64)> = grid
            .sites()
            .expect("valid sites")
            .iter()
            .map(|site| (site.latitude(), site.longitude()))
            .collect();
        assert_eq!(
            coords,
            vec![
                (33.0, -84.5),
                (33.0, -84.25),
                (33.25, -84.5),
                (33.25, -84.25),
            ]
        );
    }

    #[rstest]
    #[case(0.0)]
    #[case(-0.01)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn rejects_invalid_steps(#[case] step: f64) {
        let err = GridSpec::new(33.0, 34.0, -85.0, -84.0, step).expect_err("bad step");
        assert!(matches!(err, GridError::InvalidStep { .. }));
    }

    #[rstest]
    #[case(1e-300)]
    #[case(0.0001)]
    fn rejects_grids_that_are_too_large(#[case] step: f64) {
        let err = GridSpec::new(33.0, 34.0, -85.0, -84.0, step).expect_err("oversized grid");
        assert!(matches!(
            err,
            GridError::TooManyPoints {
                limit: MAX_GRID_POINTS,
                ..
            }
        ));
    }

    #[rstest]
    fn accepts_large_grids_below_the_limit() {
        let grid = GridSpec::new(0.0, 1.0, 0.0, 1.0, 0.000_976_562_5).expect("large grid");
        assert_eq!(grid.len(), 1_048_576);
    }

    #[rstest]
    fn rejects_inverted_bounds() {
        let err = GridSpec::new(34.0, 33.0, -85.0, -84.0, 0.1).expect_err("inverted");
        assert!(matches!(
            err,
            GridError::InvertedBounds {
                axis: "latitude",
                ..
            }
        ));
    }

    #[rstest]
    fn rejects_non_finite_bounds() {
        let err = GridSpec::new(33.0, 34.0, f64::NAN, -84.0, 0.1).expect_err("NaN bound");
        assert!(matches!(
            err,
            GridError::NonFiniteBound {
                name: "min_lon",
                ..
            }
        ));
    }

    #[rstest]
    fn rejects_bounds_outside_valid_coordinates() {
        let err = GridSpec::new(80.0, 95.0, -85.0, -84.0, 1.0).expect_err("latitude > 90");
        assert!(matches!(err, GridError::Site(_)));
    }
}
