//! Property tests for the distance primitives.

use geo::Coord;
use proptest::prelude::*;
use sitescore_core::geo_math::{DegreeWindow, grid_degree_miles, haversine_miles};

fn coordinate() -> impl Strategy<Value = Coord<f64>> {
    (-179.0_f64..179.0, -80.0_f64..80.0).prop_map(|(x, y)| Coord { x, y })
}

proptest! {
    #[test]
    fn haversine_is_symmetric_and_non_negative(a in coordinate(), b in coordinate()) {
        let forward = haversine_miles(a, b);
        let backward = haversine_miles(b, a);
        prop_assert!(forward >= 0.0);
        prop_assert!((forward - backward).abs() < 1e-6);
    }

    #[test]
    fn haversine_never_exceeds_half_the_circumference(a in coordinate(), b in coordinate()) {
        let half = std::f64::consts::PI * sitescore_core::geo_math::EARTH_RADIUS_MILES;
        prop_assert!(haversine_miles(a, b) <= half + 1e-6);
    }

    #[test]
    fn grid_distance_is_zero_only_at_the_same_point(a in coordinate()) {
        prop_assert_eq!(grid_degree_miles(a, a), 0.0);
        let shifted = Coord { x: a.x, y: a.y + 0.01 };
        prop_assert!(grid_degree_miles(a, shifted) > 0.0);
    }

    #[test]
    fn window_contains_its_centre(centre in coordinate(), radius in 0.0_f64..10.0) {
        prop_assert!(DegreeWindow::around(centre, radius).contains(centre));
    }
}
