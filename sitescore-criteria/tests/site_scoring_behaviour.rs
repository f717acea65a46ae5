//! Behavioural tests for [`ScoreAggregator`].
//!
//! Walking distances come from the routing doubles in
//! `sitescore_core::test_support`, so no routing service is needed.

use std::cell::RefCell;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use sitescore_core::test_support::{FixedDistanceProvider, UnavailableProvider, square};
use sitescore_core::{
    CensusTract, CriterionKind, HousingNeedRow, Indicator, IndicatorFlags, IndicatorRecord,
    NetworkDistanceProvider, ReferenceData, ReferenceStore, Site, TransitStop,
};
use sitescore_criteria::{
    HousingNeedConfig, PointFailure, QctStatus, ScoreAggregator, ScoreResult, ScoringConfig,
};

const TRACT: &str = "13121000100";

/// Outcome of the last scoring request.
type OutcomeCell = RefCell<Option<Result<ScoreResult, PointFailure>>>;

/// Reference data assembled by the given steps.
#[fixture]
pub fn data() -> RefCell<ReferenceData> {
    RefCell::new(ReferenceData::default())
}

/// Result of scoring the site.
#[fixture]
pub fn outcome() -> OutcomeCell {
    RefCell::new(None)
}

fn site() -> Site {
    Site::new(33.75, -84.39).expect("valid site")
}

fn score_with<P>(data: &RefCell<ReferenceData>, outcome: &OutcomeCell, aggregator: &ScoreAggregator<P>)
where
    P: NetworkDistanceProvider,
{
    let store = ReferenceStore::new(data.borrow().clone()).expect("valid reference data");
    *outcome.borrow_mut() = Some(aggregator.score(&site(), &store));
}

fn scored(outcome: &OutcomeCell) -> ScoreResult {
    let borrowed = outcome.borrow();
    match borrowed.as_ref().expect("site scored") {
        Ok(result) => *result,
        Err(err) => panic!("expected a score, got {err}"),
    }
}

// --- Given steps ---

#[given("a site next to a transit hub in a tract meeting three indicators")]
fn stable_site(#[from(data)] data: &RefCell<ReferenceData>) {
    let tract = || CensusTract::new(TRACT, square(-85.0, 33.0, 2.0));
    let mut built = data.borrow_mut();
    built.transit_stops = vec![TransitStop::new(
        Coord {
            x: -84.391,
            y: 33.751,
        },
        true,
    )];
    built.current_tracts = vec![tract()];
    built.legacy_tracts = vec![tract()];
    built.indicators = vec![IndicatorRecord::new(
        TRACT,
        IndicatorFlags::from_indicators([
            Indicator::MedianIncome,
            Indicator::JobsProximity,
            Indicator::TransitAccess,
        ]),
    )];
}

#[given("the tract reports severe housing problems")]
fn severe_housing(#[from(data)] data: &RefCell<ReferenceData>) {
    data.borrow_mut().housing_need = vec![HousingNeedRow {
        geoid: TRACT.to_owned(),
        severe_housing_problem_pct: 52.5,
        ..HousingNeedRow::default()
    }];
}

#[given("a transit stop with a corrupt coordinate")]
fn corrupt_stop(#[from(data)] data: &RefCell<ReferenceData>) {
    data.borrow_mut().transit_stops.push(TransitStop::new(
        Coord {
            x: f64::NAN,
            y: 33.75,
        },
        false,
    ));
}

// --- When steps ---

#[when("I score the site with the reduced aggregate")]
fn score_reduced(
    #[from(data)] data: &RefCell<ReferenceData>,
    #[from(outcome)] outcome: &OutcomeCell,
) {
    let aggregator = ScoreAggregator::new(FixedDistanceProvider::new(0.2));
    score_with(data, outcome, &aggregator);
}

#[when("I score the site with the extended aggregate outside a qualified census tract")]
fn score_extended(
    #[from(data)] data: &RefCell<ReferenceData>,
    #[from(outcome)] outcome: &OutcomeCell,
) {
    let config =
        ScoringConfig::default().with_housing_need(HousingNeedConfig::new(QctStatus::NotInQct));
    let aggregator = ScoreAggregator::with_config(FixedDistanceProvider::new(0.2), config)
        .expect("valid config");
    score_with(data, outcome, &aggregator);
}

#[when("I score the site while the routing service is down")]
fn score_offline(
    #[from(data)] data: &RefCell<ReferenceData>,
    #[from(outcome)] outcome: &OutcomeCell,
) {
    let aggregator = ScoreAggregator::new(UnavailableProvider);
    score_with(data, outcome, &aggregator);
}

// --- Then steps ---

#[then("transit access scores 5")]
fn then_transit(#[from(outcome)] outcome: &OutcomeCell) {
    assert_eq!(scored(outcome).scores().transit_access, 5.0);
}

#[then("neighbourhood stability scores 8")]
fn then_stability(#[from(outcome)] outcome: &OutcomeCell) {
    assert_eq!(scored(outcome).scores().neighborhood_stability, 8.0);
}

#[then("no housing-need bonus is reported")]
fn then_no_housing(#[from(outcome)] outcome: &OutcomeCell) {
    assert_eq!(scored(outcome).scores().housing_need, None);
}

#[then("the housing-need bonus scores 10")]
fn then_housing(#[from(outcome)] outcome: &OutcomeCell) {
    assert_eq!(scored(outcome).scores().housing_need, Some(10.0));
}

#[then("the total is 13")]
fn then_total_reduced(#[from(outcome)] outcome: &OutcomeCell) {
    assert_eq!(scored(outcome).total(), 13.0);
}

#[then("the total is 23")]
fn then_total_extended(#[from(outcome)] outcome: &OutcomeCell) {
    assert_eq!(scored(outcome).total(), 23.0);
}

#[then("scoring fails in transit access")]
fn then_fails(#[from(outcome)] outcome: &OutcomeCell) {
    let borrowed = outcome.borrow();
    match borrowed.as_ref().expect("site scored") {
        Err(failure) => {
            assert_eq!(failure.criterion, CriterionKind::TransitAccess);
            assert_eq!(failure.site, site());
        }
        Ok(result) => panic!("expected a failure, got {result:?}"),
    }
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/site_scoring.feature", name = $title)]
        fn $fn_name(data: RefCell<ReferenceData>, outcome: OutcomeCell) {
            let _ = (data, outcome);
        }
    };
}

register_scenario!(
    reduced_aggregate,
    "The reduced aggregate sums the four base criteria"
);
register_scenario!(
    extended_aggregate,
    "The extended aggregate adds the housing-need bonus"
);
register_scenario!(
    routing_outage,
    "A routing outage degrades to straight-line distance"
);
register_scenario!(corrupt_stop_fails, "A corrupt transit stop fails only its site");
