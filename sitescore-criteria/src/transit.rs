//! Transit access: walking distance to the nearest stop and hub.

use geo::Coord;
use serde::Serialize;
use sitescore_core::geo_math::haversine_miles;
use sitescore_core::{
    Assessment, Criterion, CriterionKind, EvaluationError, NetworkDistanceProvider, ReferenceStore,
    Site,
};

use crate::tiers::{Tiers, award};

/// Great-circle radius within which stops are considered.
pub const CANDIDATE_RADIUS_MILES: f64 = 1.1;

const HUB_TIERS: &Tiers = &[(0.25, 5.0), (0.5, 4.5), (1.0, 4.0)];
const STOP_TIERS: &Tiers = &[(0.25, 3.0), (0.5, 2.0), (1.0, 1.0)];

/// A stop within [`CANDIDATE_RADIUS_MILES`] of the site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitCandidate {
    /// Stop location.
    pub location: Coord<f64>,
    /// Whether the stop may serve as a transit hub.
    pub is_potential_hub: bool,
    /// Great-circle distance in miles.
    pub straight_line_miles: f64,
    /// Walking distance in miles used for scoring.
    pub walking_miles: f64,
    /// Whether the straight-line distance stood in for the walking distance.
    pub used_fallback: bool,
}

/// How a transit score was reached.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransitDetail {
    /// Candidates sorted by walking distance, nearest first.
    pub candidates: Vec<TransitCandidate>,
    /// Award for the nearest stop.
    pub stop_score: f64,
    /// Award for the nearest potential hub.
    pub hub_score: f64,
    /// Candidates scored on straight-line distance.
    pub fallbacks: usize,
}

/// Scores walking access to transit.
///
/// Walking distances come from a [`NetworkDistanceProvider`]. When the
/// provider fails, or answers with a negative or non-finite distance, the
/// great-circle distance is used instead and the candidate is flagged.
pub struct TransitAccess<P>
where
    P: NetworkDistanceProvider,
{
    provider: P,
}

impl<P> TransitAccess<P>
where
    P: NetworkDistanceProvider,
{
    /// Score transit using walking distances from `provider`.
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The walking-distance provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    fn walking_miles(&self, origin: Coord<f64>, stop: Coord<f64>, straight: f64) -> (f64, bool) {
        match self.provider.walking_distance(origin, stop) {
            Ok(miles) if miles.is_finite() && miles >= 0.0 => (miles, false),
            Ok(miles) => {
                log::debug!(
                    "ignoring walking distance {miles} to stop ({}, {}); using straight line",
                    stop.y,
                    stop.x
                );
                (straight, true)
            }
            Err(err) => {
                log::debug!(
                    "walking distance to stop ({}, {}) unavailable: {err}; using straight line",
                    stop.y,
                    stop.x
                );
                (straight, true)
            }
        }
    }
}

impl<P> Criterion for TransitAccess<P>
where
    P: NetworkDistanceProvider,
{
    type Detail = TransitDetail;

    fn kind(&self) -> CriterionKind {
        CriterionKind::TransitAccess
    }

    fn evaluate(
        &self,
        site: &Site,
        store: &ReferenceStore,
    ) -> Result<Assessment<TransitDetail>, EvaluationError> {
        let origin = site.coord();
        let mut candidates = Vec::new();
        for stop in store.transit_stops() {
            let straight_line_miles = haversine_miles(origin, stop.location);
            if !straight_line_miles.is_finite() {
                return Err(EvaluationError::NonFiniteDistance {
                    criterion: self.kind(),
                    target: format!("transit stop ({}, {})", stop.location.y, stop.location.x),
                });
            }
            if straight_line_miles > CANDIDATE_RADIUS_MILES {
                continue;
            }
            let (walking_miles, used_fallback) =
                self.walking_miles(origin, stop.location, straight_line_miles);
            candidates.push(TransitCandidate {
                location: stop.location,
                is_potential_hub: stop.is_potential_hub,
                straight_line_miles,
                walking_miles,
                used_fallback,
            });
        }
        candidates.sort_by(|a, b| a.walking_miles.total_cmp(&b.walking_miles));

        let stop_score = candidates
            .first()
            .map_or(0.0, |nearest| award(nearest.walking_miles, STOP_TIERS));
        let hub_score = candidates
            .iter()
            .find(|candidate| candidate.is_potential_hub)
            .map_or(0.0, |hub| award(hub.walking_miles, HUB_TIERS));
        let fallbacks = candidates.iter().filter(|c| c.used_fallback).count();
        if fallbacks > 0 {
            log::debug!(
                "{fallbacks} of {} transit candidates near ({}, {}) used straight-line distance",
                candidates.len(),
                site.latitude(),
                site.longitude()
            );
        }

        let detail = TransitDetail {
            candidates,
            stop_score,
            hub_score,
            fallbacks,
        };
        Assessment::checked(self.kind(), stop_score.max(hub_score), detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use sitescore_core::test_support::{
        FixedDistanceProvider, RouteTableProvider, UnavailableProvider,
    };
    use sitescore_core::{ReferenceData, RoutingError, TransitStop};

    const SITE_LAT: f64 = 33.75;
    const SITE_LON: f64 = -84.39;

    fn stop_north(miles: f64, is_hub: bool) -> TransitStop {
        #[expect(clippy::float_arithmetic, reason = "offset a stop by a latitude delta")]
        let latitude = SITE_LAT + miles / 69.0;
        TransitStop::new(
            Coord {
                x: SITE_LON,
                y: latitude,
            },
            is_hub,
        )
    }

    fn store_with(stops: Vec<TransitStop>) -> ReferenceStore {
        ReferenceStore::new(ReferenceData {
            transit_stops: stops,
            ..ReferenceData::default()
        })
        .expect("valid reference data")
    }

    #[fixture]
    fn site() -> Site {
        Site::new(SITE_LAT, SITE_LON).expect("valid site")
    }

    #[rstest]
    fn hub_at_quarter_mile_scores_five(site: Site) {
        let hub = stop_north(0.2, true);
        let provider = RouteTableProvider::new().with_route(hub.location, 0.25);
        let store = store_with(vec![hub]);
        let assessment = TransitAccess::new(provider)
            .evaluate(&site, &store)
            .expect("score");
        assert_eq!(assessment.score(), 5.0);
        assert_eq!(assessment.detail().hub_score, 5.0);
        assert_eq!(assessment.detail().stop_score, 3.0);
    }

    #[rstest]
    fn plain_stop_just_past_quarter_mile_scores_two(site: Site) {
        let stop = stop_north(0.2, false);
        let provider = RouteTableProvider::new().with_route(stop.location, 0.26);
        let store = store_with(vec![stop]);
        let assessment = TransitAccess::new(provider)
            .evaluate(&site, &store)
            .expect("score");
        assert_eq!(assessment.score(), 2.0);
    }

    #[rstest]
    fn stops_beyond_the_radius_are_ignored(site: Site) {
        let store = store_with(vec![stop_north(1.2, true)]);
        let assessment = TransitAccess::new(FixedDistanceProvider::new(0.1))
            .evaluate(&site, &store)
            .expect("score");
        assert_eq!(assessment.score(), 0.0);
        assert!(assessment.detail().candidates.is_empty());
    }

    #[rstest]
    fn unavailable_routing_falls_back_to_straight_line(site: Site) {
        let store = store_with(vec![stop_north(0.4, false)]);
        let assessment = TransitAccess::new(UnavailableProvider)
            .evaluate(&site, &store)
            .expect("score");
        assert_eq!(assessment.score(), 2.0);
        let candidate = assessment.detail().candidates.first().expect("candidate");
        assert!(candidate.used_fallback);
        assert_eq!(candidate.walking_miles, candidate.straight_line_miles);
        assert_eq!(assessment.detail().fallbacks, 1);
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn unusable_walking_distances_fall_back(site: Site, #[case] miles: f64) {
        let store = store_with(vec![stop_north(0.1, false)]);
        let assessment = TransitAccess::new(FixedDistanceProvider::new(miles))
            .evaluate(&site, &store)
            .expect("score");
        assert_eq!(assessment.score(), 3.0);
        assert_eq!(assessment.detail().fallbacks, 1);
    }

    #[rstest]
    fn nearest_stop_and_nearest_hub_are_scored_independently(site: Site) {
        let near_stop = stop_north(0.1, false);
        let far_hub = stop_north(0.3, true);
        let provider = RouteTableProvider::new()
            .with_route(near_stop.location, 0.6)
            .with_route(far_hub.location, 0.9);
        let store = store_with(vec![far_hub, near_stop]);
        let assessment = TransitAccess::new(provider)
            .evaluate(&site, &store)
            .expect("score");
        assert_eq!(assessment.detail().stop_score, 1.0);
        assert_eq!(assessment.detail().hub_score, 4.0);
        assert_eq!(assessment.score(), 4.0);
        let order: Vec<f64> = assessment
            .detail()
            .candidates
            .iter()
            .map(|c| c.walking_miles)
            .collect();
        assert_eq!(order, vec![0.6, 0.9]);
    }

    #[rstest]
    fn failed_routes_use_straight_line_per_candidate(site: Site) {
        let routed = stop_north(0.5, false);
        let failed = stop_north(0.9, true);
        let provider = RouteTableProvider::new()
            .with_route(routed.location, 0.7)
            .with_failure(failed.location, RoutingError::NoRoute);
        let store = store_with(vec![routed, failed]);
        let assessment = TransitAccess::new(provider)
            .evaluate(&site, &store)
            .expect("score");
        assert_eq!(assessment.detail().fallbacks, 1);
        assert_eq!(assessment.detail().stop_score, 1.0);
        assert_eq!(assessment.detail().hub_score, 4.0);
    }

    #[rstest]
    fn non_finite_stop_coordinates_are_rejected(site: Site) {
        let store = store_with(vec![TransitStop::new(
            Coord {
                x: f64::NAN,
                y: SITE_LAT,
            },
            false,
        )]);
        let err = TransitAccess::new(FixedDistanceProvider::new(0.1))
            .evaluate(&site, &store)
            .expect_err("NaN stop");
        assert!(matches!(err, EvaluationError::NonFiniteDistance { .. }));
    }
}
