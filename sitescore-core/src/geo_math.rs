//! Distance and geometry primitives shared by the criteria.
//!
//! All inputs use WGS84 degrees with `x = longitude`, `y = latitude`. Two
//! distance models are provided:
//! - [`haversine_miles`], the great-circle distance on a sphere of radius
//!   [`EARTH_RADIUS_MILES`];
//! - [`grid_degree_miles`], a cheap planar approximation scaling degree
//!   deltas by [`MILES_PER_DEGREE`].
//!
//! Buffers measured in metres are evaluated in Web Mercator (EPSG:3857),
//! which the core projects itself via [`to_web_mercator`].

use geo::{Coord, Distance, Euclidean, MapCoords, MultiPolygon, Point};
use rstar::AABB;

/// Sphere radius used for great-circle distances.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Miles per degree of latitude in the grid-degree model.
pub const MILES_PER_DEGREE: f64 = 69.0;

/// Conversion factor from metres to statute miles.
pub const MILES_PER_METRE: f64 = 0.000_621_371;

/// Semi-major axis of the WGS84 ellipsoid, used by Web Mercator.
const WEB_MERCATOR_RADIUS_METRES: f64 = 6_378_137.0;

/// Latitude limit of the Web Mercator square.
const WEB_MERCATOR_MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Great-circle distance in miles between two WGS84 coordinates.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use sitescore_core::geo_math::haversine_miles;
///
/// let here = Coord { x: -84.388, y: 33.749 };
/// assert_eq!(haversine_miles(here, here), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "haversine requires trigonometric floating-point maths"
)]
pub fn haversine_miles(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let phi1 = from.y.to_radians();
    let phi2 = to.y.to_radians();
    let d_phi = (to.y - from.y).to_radians();
    let d_lambda = (to.x - from.x).to_radians();
    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_MILES * c
}

/// Approximate planar distance in miles using degree deltas.
///
/// Latitude deltas scale by 69 miles per degree and longitude deltas by
/// `69 * cos(mean latitude)`, summed Manhattan-style.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "grid distance scales degree deltas by floating-point factors"
)]
pub fn grid_degree_miles(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let mean_latitude = (from.y + to.y) / 2.0;
    let lat_miles = (to.y - from.y).abs() * MILES_PER_DEGREE;
    let lon_miles = (to.x - from.x).abs() * MILES_PER_DEGREE * mean_latitude.to_radians().cos();
    lat_miles + lon_miles
}

/// An axis-aligned lon/lat window around a centre, sized in miles.
///
/// Containment is inclusive on every edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegreeWindow {
    min: Coord<f64>,
    max: Coord<f64>,
}

impl DegreeWindow {
    /// Build a window extending `radius_miles` from `centre` on each axis.
    ///
    /// The latitude tolerance is `radius / 69` and the longitude tolerance is
    /// `radius / (69 * cos(latitude))`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "degree tolerances divide miles by floating-point scale factors"
    )]
    pub fn around(centre: Coord<f64>, radius_miles: f64) -> Self {
        let lat_tol = radius_miles / MILES_PER_DEGREE;
        let lon_tol = radius_miles / (MILES_PER_DEGREE * centre.y.to_radians().cos());
        Self {
            min: Coord {
                x: centre.x - lon_tol,
                y: centre.y - lat_tol,
            },
            max: Coord {
                x: centre.x + lon_tol,
                y: centre.y + lat_tol,
            },
        }
    }

    /// Report whether `coord` lies inside the window or on its edge.
    #[must_use]
    pub fn contains(&self, coord: Coord<f64>) -> bool {
        (self.min.x..=self.max.x).contains(&coord.x) && (self.min.y..=self.max.y).contains(&coord.y)
    }

    /// The window as an R\*-tree envelope.
    #[must_use]
    pub fn envelope(&self) -> AABB<[f64; 2]> {
        AABB::from_corners([self.min.x, self.min.y], [self.max.x, self.max.y])
    }
}

/// Project a WGS84 coordinate to Web Mercator metres.
///
/// Latitudes beyond the Mercator limit are clamped.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "spherical Mercator projection is floating-point maths"
)]
pub fn to_web_mercator(coord: Coord<f64>) -> Coord<f64> {
    let latitude = coord.y.clamp(-WEB_MERCATOR_MAX_LATITUDE, WEB_MERCATOR_MAX_LATITUDE);
    let x = WEB_MERCATOR_RADIUS_METRES * coord.x.to_radians();
    let y = WEB_MERCATOR_RADIUS_METRES
        * (std::f64::consts::FRAC_PI_4 + latitude.to_radians() / 2.0)
            .tan()
            .ln();
    Coord { x, y }
}

/// Inverse of [`to_web_mercator`].
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "inverse Mercator projection is floating-point maths"
)]
pub fn from_web_mercator(coord: Coord<f64>) -> Coord<f64> {
    let longitude = (coord.x / WEB_MERCATOR_RADIUS_METRES).to_degrees();
    let latitude = (2.0 * (coord.y / WEB_MERCATOR_RADIUS_METRES).exp().atan()
        - std::f64::consts::FRAC_PI_2)
        .to_degrees();
    Coord {
        x: longitude,
        y: latitude,
    }
}

/// Project every vertex of a WGS84 multipolygon to Web Mercator.
#[must_use]
pub fn project_multipolygon(geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    geometry.map_coords(to_web_mercator)
}

/// Report whether a planar disc of `radius` around `centre` touches `geometry`.
///
/// Both inputs must share the same planar reference system. A centre inside
/// the geometry is at distance zero.
#[must_use]
pub fn disc_intersects(geometry: &MultiPolygon<f64>, centre: Coord<f64>, radius: f64) -> bool {
    Euclidean.distance(geometry, &Point::from(centre)) <= radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::square;
    use rstest::rstest;

    const TOLERANCE: f64 = 1e-9;

    #[rstest]
    fn haversine_matches_one_degree_of_latitude() {
        let a = Coord { x: 0.0, y: 0.0 };
        let b = Coord { x: 0.0, y: 1.0 };
        let expected = EARTH_RADIUS_MILES * 1.0_f64.to_radians();
        assert!((haversine_miles(a, b) - expected).abs() < TOLERANCE);
    }

    #[rstest]
    fn haversine_is_symmetric() {
        let a = Coord { x: -84.39, y: 33.75 };
        let b = Coord { x: -84.30, y: 33.80 };
        assert!((haversine_miles(a, b) - haversine_miles(b, a)).abs() < TOLERANCE);
    }

    #[rstest]
    fn grid_distance_scales_longitude_by_mean_latitude() {
        let a = Coord { x: 0.0, y: 60.0 };
        let b = Coord { x: 1.0, y: 60.0 };
        assert!((grid_degree_miles(a, b) - 34.5).abs() < 1e-6);
    }

    #[rstest]
    fn grid_distance_sums_axis_components() {
        let a = Coord { x: 0.0, y: 0.0 };
        let b = Coord { x: 0.0, y: 0.5 };
        assert!((grid_degree_miles(a, b) - 34.5).abs() < TOLERANCE);
    }

    #[rstest]
    fn window_includes_edges() {
        let centre = Coord { x: 0.0, y: 0.0 };
        let window = DegreeWindow::around(centre, 69.0);
        assert!(window.contains(Coord { x: 1.0, y: 1.0 }));
        assert!(!window.contains(Coord { x: 0.0, y: 1.000_001 }));
    }

    #[rstest]
    #[case(Coord { x: -84.388, y: 33.749 })]
    #[case(Coord { x: 151.2, y: -33.9 })]
    fn mercator_round_trips(#[case] coord: Coord<f64>) {
        let back = from_web_mercator(to_web_mercator(coord));
        assert!((back.x - coord.x).abs() < 1e-9);
        assert!((back.y - coord.y).abs() < 1e-9);
    }

    #[rstest]
    #[case(5.0, 5.0, 0.0, true)]
    #[case(-3.0, 5.0, 3.0, true)]
    #[case(-3.0, 5.0, 2.9, false)]
    #[case(13.0, 14.0, 5.0, true)]
    fn disc_intersection(
        #[case] x: f64,
        #[case] y: f64,
        #[case] radius: f64,
        #[case] expected: bool,
    ) {
        let block = square(0.0, 0.0, 10.0);
        assert_eq!(disc_intersects(&block, Coord { x, y }, radius), expected);
    }
}
