//! Property tests for grid enumeration.

use proptest::prelude::*;
use sitescore_grid::GridSpec;

fn grid() -> impl Strategy<Value = GridSpec> {
    (
        -60.0_f64..60.0,
        0.01_f64..2.0,
        -170.0_f64..170.0,
        0.01_f64..2.0,
        0.05_f64..0.5,
    )
        .prop_map(|(lat, lat_span, lon, lon_span, step)| {
            GridSpec::new(lat, lat + lat_span, lon, lon + lon_span, step).expect("valid grid")
        })
}

proptest! {
    #[test]
    fn point_count_is_rows_times_columns(grid in grid()) {
        let sites = grid.sites().expect("valid sites");
        prop_assert_eq!(sites.len(), grid.len());
        prop_assert_eq!(grid.len(), grid.latitudes().len() * grid.longitudes().len());
        prop_assert!(!grid.is_empty());
    }

    #[test]
    fn axes_start_at_the_minimum_and_stay_below_the_maximum(grid in grid()) {
        let latitudes = grid.latitudes();
        let longitudes = grid.longitudes();
        for axis in [&latitudes, &longitudes] {
            prop_assert!(axis.windows(2).all(|pair| pair[0] < pair[1]));
        }
        let sites = grid.sites().expect("valid sites");
        let first = sites.first().expect("non-empty grid");
        prop_assert_eq!(first.latitude(), latitudes[0]);
        prop_assert_eq!(first.longitude(), longitudes[0]);
    }
}
