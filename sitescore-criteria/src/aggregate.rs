//! Combine the criteria into one score per site.

use serde::Serialize;
use sitescore_core::{Criterion, CriterionKind, NetworkDistanceProvider, ReferenceStore, Site};

use crate::{
    ActivityBalance, HousingNeedBonus, NeighborhoodStability, PointFailure, SchoolQuality,
    ScoringConfig, ScoringConfigError, TransitAccess,
};

/// Sub-scores of one site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CriterionScores {
    /// Transit access, `0..=5`.
    pub transit_access: f64,
    /// Activity balance, `0..=20`.
    pub activity_balance: f64,
    /// School quality, `0..=3`.
    pub school_quality: f64,
    /// Neighbourhood stability, `0..=10`.
    pub neighborhood_stability: f64,
    /// Housing-need bonus, `0..=10`; `None` in the reduced aggregate.
    pub housing_need: Option<f64>,
}

impl CriterionScores {
    /// The sub-score of `kind`, if it was evaluated.
    #[must_use]
    pub const fn get(&self, kind: CriterionKind) -> Option<f64> {
        match kind {
            CriterionKind::TransitAccess => Some(self.transit_access),
            CriterionKind::ActivityBalance => Some(self.activity_balance),
            CriterionKind::SchoolQuality => Some(self.school_quality),
            CriterionKind::NeighborhoodStability => Some(self.neighborhood_stability),
            CriterionKind::HousingNeedBonus => self.housing_need,
        }
    }

    #[expect(clippy::float_arithmetic, reason = "the total is a sum of sub-scores")]
    fn total(&self) -> f64 {
        self.transit_access
            + self.activity_balance
            + self.school_quality
            + self.neighborhood_stability
            + self.housing_need.unwrap_or(0.0)
    }
}

/// Scores of one site and their sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreResult {
    site: Site,
    scores: CriterionScores,
    total: f64,
}

impl ScoreResult {
    fn new(site: Site, scores: CriterionScores) -> Self {
        Self {
            site,
            total: scores.total(),
            scores,
        }
    }

    /// The scored site.
    #[must_use]
    pub const fn site(&self) -> Site {
        self.site
    }

    /// Per-criterion sub-scores.
    #[must_use]
    pub const fn scores(&self) -> &CriterionScores {
        &self.scores
    }

    /// Sum of the sub-scores.
    #[must_use]
    pub const fn total(&self) -> f64 {
        self.total
    }
}

/// Runs every criterion for a site and sums the results.
///
/// Without a housing-need configuration the aggregator scores the four base
/// criteria. With one, it also scores the housing-need bonus, reusing the
/// site's stability score.
pub struct ScoreAggregator<P>
where
    P: NetworkDistanceProvider,
{
    transit: TransitAccess<P>,
    activity: ActivityBalance,
    school: SchoolQuality,
    stability: NeighborhoodStability,
    housing_need: Option<HousingNeedBonus>,
}

impl<P> ScoreAggregator<P>
where
    P: NetworkDistanceProvider,
{
    /// Build the reduced aggregate with default settings.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self::from_parts(provider, ScoringConfig::default())
    }

    /// Build an aggregate from `config`.
    ///
    /// # Errors
    /// Returns [`ScoringConfigError`] when the configuration is invalid.
    pub fn with_config(provider: P, config: ScoringConfig) -> Result<Self, ScoringConfigError> {
        config.validate()?;
        Ok(Self::from_parts(provider, config))
    }

    fn from_parts(provider: P, config: ScoringConfig) -> Self {
        Self {
            transit: TransitAccess::new(provider),
            activity: ActivityBalance::new(),
            school: SchoolQuality::new(config.regional_averages, config.tenancy),
            stability: NeighborhoodStability::new(),
            housing_need: config.housing_need.map(HousingNeedBonus::new),
        }
    }

    /// Report whether the housing-need bonus is scored.
    #[must_use]
    pub const fn is_extended(&self) -> bool {
        self.housing_need.is_some()
    }

    /// The provider used for walking distances.
    #[must_use]
    pub const fn provider(&self) -> &P {
        self.transit.provider()
    }

    /// Score `site` against every configured criterion.
    ///
    /// # Errors
    /// Returns [`PointFailure`] naming the first criterion that failed.
    pub fn score(&self, site: &Site, store: &ReferenceStore) -> Result<ScoreResult, PointFailure> {
        let transit_access = run(&self.transit, site, store)?;
        let activity_balance = run(&self.activity, site, store)?;
        let school_quality = run(&self.school, site, store)?;
        let neighborhood_stability = run(&self.stability, site, store)?;
        let housing_need = self
            .housing_need
            .as_ref()
            .map(|bonus| {
                bonus
                    .evaluate_with_stability(site, store, Some(neighborhood_stability))
                    .map(|assessment| assessment.score())
                    .map_err(|err| PointFailure::new(*site, bonus.kind(), err))
            })
            .transpose()?;

        Ok(ScoreResult::new(
            *site,
            CriterionScores {
                transit_access,
                activity_balance,
                school_quality,
                neighborhood_stability,
                housing_need,
            },
        ))
    }
}

fn run<C>(criterion: &C, site: &Site, store: &ReferenceStore) -> Result<f64, PointFailure>
where
    C: Criterion,
{
    criterion
        .evaluate(site, store)
        .map(|assessment| assessment.score())
        .map_err(|err| PointFailure::new(*site, criterion.kind(), err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use sitescore_core::test_support::{FixedDistanceProvider, square};
    use sitescore_core::{
        CensusTract, HousingNeedRow, Indicator, IndicatorFlags, IndicatorRecord, ReferenceData,
        TransitStop,
    };

    use crate::{HousingNeedConfig, QctStatus};

    const TRACT: &str = "13121000100";

    #[fixture]
    fn site() -> Site {
        Site::new(33.75, -84.39).expect("valid site")
    }

    #[fixture]
    fn store() -> ReferenceStore {
        let tract = || CensusTract::new(TRACT, square(-85.0, 33.0, 2.0));
        ReferenceStore::new(ReferenceData {
            transit_stops: vec![TransitStop::new(
                geo::Coord { x: -84.391, y: 33.751 },
                true,
            )],
            current_tracts: vec![tract()],
            legacy_tracts: vec![tract()],
            indicators: vec![IndicatorRecord::new(
                TRACT,
                IndicatorFlags::from_indicators([
                    Indicator::MedianIncome,
                    Indicator::JobsProximity,
                    Indicator::TransitAccess,
                ]),
            )],
            housing_need: vec![HousingNeedRow {
                geoid: TRACT.to_owned(),
                severe_housing_problem_pct: 50.0,
                ..HousingNeedRow::default()
            }],
            ..ReferenceData::default()
        })
        .expect("valid reference data")
    }

    #[rstest]
    fn reduced_aggregate_sums_four_criteria(site: Site, store: ReferenceStore) {
        let aggregator = ScoreAggregator::new(FixedDistanceProvider::new(0.2));
        assert!(!aggregator.is_extended());
        let result = aggregator.score(&site, &store).expect("score");
        assert_eq!(result.scores().transit_access, 5.0);
        assert_eq!(result.scores().neighborhood_stability, 8.0);
        assert_eq!(result.scores().housing_need, None);
        assert_eq!(result.total(), 13.0);
        assert_eq!(result.site(), site);
    }

    #[rstest]
    fn extended_aggregate_adds_the_housing_bonus(site: Site, store: ReferenceStore) {
        let config = ScoringConfig::default()
            .with_housing_need(HousingNeedConfig::new(QctStatus::NotInQct));
        let aggregator = ScoreAggregator::with_config(FixedDistanceProvider::new(0.2), config)
            .expect("valid config");
        let result = aggregator.score(&site, &store).expect("score");
        assert_eq!(result.scores().get(CriterionKind::HousingNeedBonus), Some(10.0));
        assert_eq!(result.total(), 23.0);
    }

    #[rstest]
    fn scoring_is_idempotent(site: Site, store: ReferenceStore) {
        let aggregator = ScoreAggregator::new(FixedDistanceProvider::new(0.4));
        let first = aggregator.score(&site, &store).expect("score");
        let second = aggregator.score(&site, &store).expect("score");
        assert_eq!(first, second);
    }

    #[rstest]
    fn non_finite_walking_distances_fall_back(site: Site, store: ReferenceStore) {
        let aggregator = ScoreAggregator::new(FixedDistanceProvider::new(f64::NAN));
        let result = aggregator.score(&site, &store).expect("score");
        assert_eq!(result.scores().transit_access, 5.0);
    }

    #[rstest]
    fn invalid_config_is_rejected() {
        let config = ScoringConfig::default().with_regional_averages(
            crate::RegionalAverages::empty().with_year(
                sitescore_core::GradeCluster::High,
                2019,
                f64::INFINITY,
            ),
        );
        let result = ScoreAggregator::with_config(FixedDistanceProvider::new(0.2), config);
        assert!(result.is_err());
    }
}
