//! Error types raised while configuring or running the evaluators.

use sitescore_core::{CriterionKind, EvaluationError, GradeCluster, Site};
use thiserror::Error;

/// Errors raised by [`ScoringConfig::validate`](crate::ScoringConfig::validate).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringConfigError {
    /// A regional average was NaN or infinite.
    #[error("regional average for {cluster:?} in {year} is not finite: {value}")]
    NonFiniteRegionalAverage {
        /// Grade cluster of the offending entry.
        cluster: GradeCluster,
        /// Year of the offending entry.
        year: u16,
        /// Offending value.
        value: f64,
    },
}

/// A site whose score could not be computed.
///
/// The grid driver excludes the site from its results and reports the
/// failure alongside them.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "failed to score site at ({}, {}) in {criterion}: {source}",
    .site.latitude(),
    .site.longitude()
)]
pub struct PointFailure {
    /// The site being scored.
    pub site: Site,
    /// The criterion that failed.
    pub criterion: CriterionKind,
    /// Underlying evaluation error.
    #[source]
    pub source: EvaluationError,
}

impl PointFailure {
    /// Attribute `source` to `criterion` at `site`.
    #[must_use]
    pub const fn new(site: Site, criterion: CriterionKind, source: EvaluationError) -> Self {
        Self {
            site,
            criterion,
            source,
        }
    }
}
