//! Neighbourhood stability: opportunity indicators around a site.

use serde::Serialize;
use sitescore_core::{
    Assessment, Criterion, CriterionKind, EvaluationError, IndicatorFlags, ReferenceStore, Site,
};

/// Radius of the nearby-tract buffer, roughly a quarter mile.
pub const NEARBY_BUFFER_METRES: f64 = 402.0;

/// How a stability score was reached.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StabilityDetail {
    /// Current-vintage tract containing the site.
    pub actual_tract: Option<String>,
    /// Other tracts touching the buffer, in layer order.
    pub nearby_tracts: Vec<String>,
    /// Indicators set on the containing tract.
    pub actual_count: u32,
    /// Indicators set on any nearby tract.
    pub nearby_count: u32,
    /// Indicators set on the containing or any nearby tract.
    pub combined_count: u32,
    /// Award earned by the containing tract alone.
    pub actual_only_score: f64,
    /// Award earned with nearby tracts included.
    pub nearby_score: f64,
}

/// Scores how many opportunity indicators the site's neighbourhood meets.
///
/// The containing tract alone can earn up to 10 points. Counting indicators
/// from tracts within [`NEARBY_BUFFER_METRES`] earns up to 9, and only when a
/// nearby tract contributes at least one indicator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeighborhoodStability;

impl NeighborhoodStability {
    /// Construct the evaluator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

const fn actual_only_points(actual_count: u32) -> f64 {
    match actual_count {
        0 | 1 => 0.0,
        2 => 6.0,
        3 => 8.0,
        _ => 10.0,
    }
}

const fn nearby_points(nearby_count: u32, combined_count: u32) -> f64 {
    if nearby_count == 0 {
        return 0.0;
    }
    match combined_count {
        0 | 1 => 0.0,
        2 => 5.0,
        3 => 7.0,
        _ => 9.0,
    }
}

impl Criterion for NeighborhoodStability {
    type Detail = StabilityDetail;

    fn kind(&self) -> CriterionKind {
        CriterionKind::NeighborhoodStability
    }

    fn evaluate(
        &self,
        site: &Site,
        store: &ReferenceStore,
    ) -> Result<Assessment<StabilityDetail>, EvaluationError> {
        let tracts = store.current_tracts();
        let indicators = store.indicators();
        let flags_of = |geoid: &str| indicators.get(geoid).unwrap_or(IndicatorFlags::NONE);

        let actual_tract = tracts
            .containing(site.coord())
            .map(|tract| tract.geoid.clone());
        let nearby_tracts: Vec<String> = tracts
            .within_buffer(site.coord(), NEARBY_BUFFER_METRES)
            .into_iter()
            .filter(|tract| actual_tract.as_deref() != Some(tract.geoid.as_str()))
            .map(|tract| tract.geoid.clone())
            .collect();
        if actual_tract.is_none() {
            log::debug!(
                "no current tract contains ({}, {})",
                site.latitude(),
                site.longitude()
            );
        }

        let actual_flags = actual_tract.as_deref().map_or(IndicatorFlags::NONE, flags_of);
        let nearby_flags = nearby_tracts
            .iter()
            .map(|geoid| flags_of(geoid))
            .fold(IndicatorFlags::NONE, IndicatorFlags::union);
        let actual_count = actual_flags.count();
        let nearby_count = nearby_flags.count();
        let combined_count = actual_flags.union(nearby_flags).count();

        let actual_only_score = actual_only_points(actual_count);
        let nearby_score = nearby_points(nearby_count, combined_count);
        let detail = StabilityDetail {
            actual_tract,
            nearby_tracts,
            actual_count,
            nearby_count,
            combined_count,
            actual_only_score,
            nearby_score,
        };
        Assessment::checked(self.kind(), actual_only_score.max(nearby_score), detail)
    }
}
