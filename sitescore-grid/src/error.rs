//! Errors raised while building or running a grid scan.

use sitescore_core::{Site, SiteError};
use sitescore_criteria::PointFailure;
use thiserror::Error;

/// Errors that stop a scan before any point is scored.
#[derive(Debug, Error)]
pub enum GridError {
    /// The step is zero, negative or not finite.
    #[error("grid step must be a positive finite number, got {step}")]
    InvalidStep {
        /// Offending step in degrees.
        step: f64,
    },
    /// A bound is NaN or infinite.
    #[error("grid bound {name} is not finite: {value}")]
    NonFiniteBound {
        /// Name of the bound, e.g. `min_lat`.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// A minimum is not below its maximum.
    #[error("grid {axis} bounds are inverted: {min} >= {max}")]
    InvertedBounds {
        /// `latitude` or `longitude`.
        axis: &'static str,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// The grid would hold more points than a scan accepts.
    #[error("grid step {step} yields more than {limit} points")]
    TooManyPoints {
        /// Offending step in degrees.
        step: f64,
        /// Largest accepted point count.
        limit: usize,
    },
    /// A grid point is not a valid coordinate.
    #[error("grid point is not a valid site")]
    Site(#[from] SiteError),
    /// The worker pool could not be created.
    #[error("failed to build the scan worker pool")]
    ThreadPool(#[source] rayon::ThreadPoolBuildError),
}

/// A point excluded from a scan.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanFailure {
    /// A criterion failed for the point.
    #[error(transparent)]
    Evaluation(#[from] PointFailure),
    /// Scoring the point panicked.
    #[error(
        "scoring panicked at ({}, {}): {message}",
        .site.latitude(),
        .site.longitude()
    )]
    Panicked {
        /// The point being scored.
        site: Site,
        /// Panic payload, when it was a string.
        message: String,
    },
}

impl ScanFailure {
    /// The point that was excluded.
    #[must_use]
    pub const fn site(&self) -> Site {
        match self {
            Self::Evaluation(failure) => failure.site,
            Self::Panicked { site, .. } => *site,
        }
    }
}
