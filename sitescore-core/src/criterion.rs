//! Evaluate a single policy criterion for a candidate site.
//!
//! Every criterion is a pure function of a [`Site`] and the shared, read-only
//! [`ReferenceStore`]. Implementations return an [`Assessment`] carrying the
//! bounded score plus a criterion-specific diagnostic detail.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ReferenceStore, Site};

/// The closed set of policy criteria scored by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    /// Proximity to transit stops and potential hubs.
    TransitAccess,
    /// Nearby desirable amenities minus undesirable land uses.
    ActivityBalance,
    /// Grade coverage by high-performing zoned schools.
    SchoolQuality,
    /// Opportunity indicators of the containing and adjacent tracts.
    NeighborhoodStability,
    /// Bonus for tracts with demonstrated housing need.
    HousingNeedBonus,
}

impl CriterionKind {
    /// Every criterion in scoring order.
    pub const ALL: [Self; 5] = [
        Self::TransitAccess,
        Self::ActivityBalance,
        Self::SchoolQuality,
        Self::NeighborhoodStability,
        Self::HousingNeedBonus,
    ];

    /// Upper bound of the criterion's sub-score.
    #[must_use]
    pub const fn max_score(self) -> f64 {
        match self {
            Self::TransitAccess => 5.0,
            Self::ActivityBalance => 20.0,
            Self::SchoolQuality => 3.0,
            Self::NeighborhoodStability | Self::HousingNeedBonus => 10.0,
        }
    }

    /// Stable `snake_case` identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TransitAccess => "transit_access",
            Self::ActivityBalance => "activity_balance",
            Self::SchoolQuality => "school_quality",
            Self::NeighborhoodStability => "neighborhood_stability",
            Self::HousingNeedBonus => "housing_need_bonus",
        }
    }
}

impl fmt::Display for CriterionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while evaluating a criterion for one site.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    /// The computed score was not finite or fell outside `0..=max`.
    #[error("{criterion} produced score {score} outside 0..={max}")]
    ScoreOutOfRange {
        /// Criterion that produced the score.
        criterion: CriterionKind,
        /// Offending score.
        score: f64,
        /// Documented maximum for the criterion.
        max: f64,
    },
    /// A distance computation produced a non-finite value.
    #[error("{criterion} computed a non-finite distance to {target}")]
    NonFiniteDistance {
        /// Criterion performing the computation.
        criterion: CriterionKind,
        /// Description of the reference feature involved.
        target: String,
    },
}

/// A bounded sub-score with diagnostic detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment<D> {
    score: f64,
    detail: D,
}

impl<D> Assessment<D> {
    /// Validate `score` against the criterion's range and wrap it.
    ///
    /// # Errors
    /// Returns [`EvaluationError::ScoreOutOfRange`] when `score` is not finite
    /// or lies outside `0..=criterion.max_score()`.
    ///
    /// # Examples
    /// ```
    /// use sitescore_core::{Assessment, CriterionKind};
    ///
    /// let ok = Assessment::checked(CriterionKind::SchoolQuality, 1.5, ());
    /// assert!(ok.is_ok());
    /// let too_high = Assessment::checked(CriterionKind::SchoolQuality, 3.5, ());
    /// assert!(too_high.is_err());
    /// ```
    pub fn checked(criterion: CriterionKind, score: f64, detail: D) -> Result<Self, EvaluationError> {
        let max = criterion.max_score();
        if !score.is_finite() || !(0.0..=max).contains(&score) {
            return Err(EvaluationError::ScoreOutOfRange {
                criterion,
                score,
                max,
            });
        }
        Ok(Self { score, detail })
    }

    /// The bounded sub-score.
    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }

    /// Diagnostic detail describing how the score was reached.
    #[must_use]
    pub const fn detail(&self) -> &D {
        &self.detail
    }

    /// Consume the assessment and return its detail.
    #[must_use]
    pub fn into_detail(self) -> D {
        self.detail
    }
}

/// A single policy rule producing a bounded sub-score.
///
/// Implementations must be thread-safe (`Send` + `Sync`) so one evaluator can
/// serve every worker of a grid scan. Missing reference rows are not errors;
/// implementations fall back to conservative zero or `false` defaults.
///
/// # Examples
///
/// ```rust
/// use sitescore_core::{
///     Assessment, Criterion, CriterionKind, EvaluationError, ReferenceData, ReferenceStore, Site,
/// };
///
/// struct Constant;
///
/// impl Criterion for Constant {
///     type Detail = ();
///
///     fn kind(&self) -> CriterionKind {
///         CriterionKind::TransitAccess
///     }
///
///     fn evaluate(
///         &self,
///         _site: &Site,
///         _store: &ReferenceStore,
///     ) -> Result<Assessment<()>, EvaluationError> {
///         Assessment::checked(self.kind(), 2.0, ())
///     }
/// }
///
/// let store = ReferenceStore::new(ReferenceData::default())?;
/// let site = Site::new(33.7, -84.4)?;
/// assert_eq!(Constant.evaluate(&site, &store)?.score(), 2.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Criterion: Send + Sync {
    /// Criterion-specific diagnostic payload.
    type Detail: fmt::Debug + Send;

    /// The criterion this evaluator implements.
    fn kind(&self) -> CriterionKind;

    /// Score `site` against the reference datasets in `store`.
    ///
    /// # Errors
    /// Returns [`EvaluationError`] when the computation cannot produce a
    /// valid bounded score.
    fn evaluate(
        &self,
        site: &Site,
        store: &ReferenceStore,
    ) -> Result<Assessment<Self::Detail>, EvaluationError>;
}
