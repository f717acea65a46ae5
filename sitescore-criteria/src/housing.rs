//! Housing-need bonus for tracts with demonstrated need.

use serde::Serialize;
use sitescore_core::{
    Assessment, Criterion, CriterionKind, EvaluationError, HousingNeedRow, ReferenceStore, Site,
};

use crate::{HousingNeedConfig, NeighborhoodStability};

const SEVERE_HOUSING_PROBLEM_PCT: f64 = 45.0;
const POPULATION_GROWTH_RATE: f64 = 1.0;
const EMPLOYMENT_CHANGE: f64 = 1.0;
const STABILITY_FOR_BONUS: f64 = 5.0;
const BASE_POINTS: f64 = 5.0;
const BASE_WITH_STABILITY_POINTS: f64 = 10.0;

/// How a housing-need score was reached.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HousingNeedDetail {
    /// Legacy-vintage tract containing the site.
    pub tract_id: Option<String>,
    /// Whether the tract had a housing-need row.
    pub row_found: bool,
    /// Severe housing problems at or above the threshold.
    pub severe_housing_problem: bool,
    /// Population grew and grows faster than the threshold.
    pub population_growth: bool,
    /// Employment change above the threshold.
    pub employment_growth: bool,
    /// Whether the site is in a qualified census tract.
    pub in_qct: bool,
    /// Whether the base award was earned.
    pub base_qualified: bool,
    /// Stability score used for the bonus, if one was available.
    pub stability_score: Option<f64>,
    /// Whether the stability bonus was earned.
    pub stability_bonus: bool,
}

/// Scores demonstrated housing need.
///
/// The base award requires severe housing problems, population growth or
/// employment growth, and a site outside every qualified census tract. A
/// stable neighbourhood doubles the award.
#[derive(Debug, Clone, Copy)]
pub struct HousingNeedBonus {
    config: HousingNeedConfig,
}

impl HousingNeedBonus {
    /// Score housing need with the given configuration.
    #[must_use]
    pub const fn new(config: HousingNeedConfig) -> Self {
        Self { config }
    }

    /// Score housing need using a stability score computed elsewhere.
    ///
    /// When `supplied_stability` is `None` and the site earns the base award,
    /// the stability criterion is evaluated here. If that fails, the bonus is
    /// withheld and a warning logged.
    ///
    /// # Errors
    /// Returns [`EvaluationError`] when the final score falls outside the
    /// criterion's range.
    pub fn evaluate_with_stability(
        &self,
        site: &Site,
        store: &ReferenceStore,
        supplied_stability: Option<f64>,
    ) -> Result<Assessment<HousingNeedDetail>, EvaluationError> {
        let tract_id = store
            .legacy_tracts()
            .containing(site.coord())
            .map(|tract| tract.geoid.clone());
        let found = tract_id.as_deref().and_then(|id| store.housing_need().get(id));
        if found.is_none() {
            log::debug!(
                "no housing-need row for ({}, {}); using zero measures",
                site.latitude(),
                site.longitude()
            );
        }
        let fallback = HousingNeedRow::default();
        let row = found.unwrap_or(&fallback);

        let severe_housing_problem = row.severe_housing_problem_pct >= SEVERE_HOUSING_PROBLEM_PCT;
        let population_growth =
            row.population_grew && row.average_growth_rate > POPULATION_GROWTH_RATE;
        let employment_growth = row.average_employment_change > EMPLOYMENT_CHANGE;
        let in_qct = self.config.qct.is_qualified();
        let base_qualified =
            (severe_housing_problem || population_growth || employment_growth) && !in_qct;

        let stability_score = supplied_stability.or_else(|| {
            if !base_qualified {
                return None;
            }
            match NeighborhoodStability::new().evaluate(site, store) {
                Ok(assessment) => Some(assessment.score()),
                Err(err) => {
                    log::warn!(
                        "stability unavailable for housing bonus at ({}, {}): {err}",
                        site.latitude(),
                        site.longitude()
                    );
                    None
                }
            }
        });
        let stability_bonus =
            base_qualified && stability_score.is_some_and(|score| score >= STABILITY_FOR_BONUS);

        let score = match (base_qualified, stability_bonus) {
            (true, true) => BASE_WITH_STABILITY_POINTS,
            (true, false) => BASE_POINTS,
            (false, _) => 0.0,
        };
        let detail = HousingNeedDetail {
            tract_id,
            row_found: found.is_some(),
            severe_housing_problem,
            population_growth,
            employment_growth,
            in_qct,
            base_qualified,
            stability_score,
            stability_bonus,
        };
        Assessment::checked(self.kind(), score, detail)
    }
}

impl Criterion for HousingNeedBonus {
    type Detail = HousingNeedDetail;

    fn kind(&self) -> CriterionKind {
        CriterionKind::HousingNeedBonus
    }

    fn evaluate(
        &self,
        site: &Site,
        store: &ReferenceStore,
    ) -> Result<Assessment<HousingNeedDetail>, EvaluationError> {
        self.evaluate_with_stability(site, store, None)
    }
}
