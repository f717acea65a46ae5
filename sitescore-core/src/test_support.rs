//! Deterministic fixtures and routing doubles for unit and behaviour tests.

use geo::{Coord, LineString, MultiPolygon, Polygon};

use crate::{NetworkDistanceProvider, RoutingError};

/// Axis-aligned square with its south-west corner at `(min_x, min_y)`.
#[must_use]
pub fn square(min_x: f64, min_y: f64, size: f64) -> MultiPolygon<f64> {
    let max_x = min_x + size;
    let max_y = min_y + size;
    MultiPolygon::new(vec![Polygon::new(
        LineString::from(vec![
            (min_x, min_y),
            (max_x, min_y),
            (max_x, max_y),
            (min_x, max_y),
            (min_x, min_y),
        ]),
        vec![],
    )])
}

/// Provider answering every query with the same distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDistanceProvider {
    miles: f64,
}

impl FixedDistanceProvider {
    /// Answer every query with `miles`.
    #[must_use]
    pub const fn new(miles: f64) -> Self {
        Self { miles }
    }
}

impl NetworkDistanceProvider for FixedDistanceProvider {
    fn walking_distance(
        &self,
        _origin: Coord<f64>,
        _destination: Coord<f64>,
    ) -> Result<f64, RoutingError> {
        Ok(self.miles)
    }
}

/// Provider whose service is always unreachable.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableProvider;

impl NetworkDistanceProvider for UnavailableProvider {
    fn walking_distance(
        &self,
        _origin: Coord<f64>,
        _destination: Coord<f64>,
    ) -> Result<f64, RoutingError> {
        Err(RoutingError::Network {
            url: String::from("http://routing.invalid"),
            message: String::from("connection refused"),
        })
    }
}

/// Provider answering per destination; unknown destinations have no route.
#[derive(Debug, Default, Clone)]
pub struct RouteTableProvider {
    routes: Vec<(Coord<f64>, Result<f64, RoutingError>)>,
}

impl RouteTableProvider {
    /// Start with no known routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer queries to `destination` with `miles`.
    #[must_use]
    pub fn with_route(mut self, destination: Coord<f64>, miles: f64) -> Self {
        self.routes.push((destination, Ok(miles)));
        self
    }

    /// Answer queries to `destination` with `error`.
    #[must_use]
    pub fn with_failure(mut self, destination: Coord<f64>, error: RoutingError) -> Self {
        self.routes.push((destination, Err(error)));
        self
    }
}

impl NetworkDistanceProvider for RouteTableProvider {
    fn walking_distance(
        &self,
        _origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<f64, RoutingError> {
        self.routes
            .iter()
            .find(|(known, _)| *known == destination)
            .map_or(Err(RoutingError::NoRoute), |(_, answer)| answer.clone())
    }
}
