//! Network distance provider trait.

use geo::Coord;

use super::error::RoutingError;

/// Answer shortest-walk distance queries between two coordinates.
///
/// Implementations return the distance in miles along the pedestrian network.
/// They must be thread-safe, since one provider serves every worker of a grid
/// scan, and should bound each request with a short timeout.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use sitescore_core::{NetworkDistanceProvider, RoutingError};
///
/// struct Doubled;
///
/// impl NetworkDistanceProvider for Doubled {
///     fn walking_distance(
///         &self,
///         origin: Coord<f64>,
///         destination: Coord<f64>,
///     ) -> Result<f64, RoutingError> {
///         let straight = sitescore_core::geo_math::haversine_miles(origin, destination);
///         Ok(straight * 2.0)
///     }
/// }
///
/// let here = Coord { x: -84.39, y: 33.75 };
/// assert_eq!(Doubled.walking_distance(here, here)?, 0.0);
/// # Ok::<(), RoutingError>(())
/// ```
pub trait NetworkDistanceProvider: Send + Sync {
    /// Return the walking distance in miles from `origin` to `destination`.
    ///
    /// # Errors
    /// Returns [`RoutingError`] when the route cannot be computed.
    fn walking_distance(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<f64, RoutingError>;
}

impl<P> NetworkDistanceProvider for &P
where
    P: NetworkDistanceProvider + ?Sized,
{
    fn walking_distance(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<f64, RoutingError> {
        (**self).walking_distance(origin, destination)
    }
}

impl<P> NetworkDistanceProvider for std::sync::Arc<P>
where
    P: NetworkDistanceProvider + ?Sized,
{
    fn walking_distance(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<f64, RoutingError> {
        (**self).walking_distance(origin, destination)
    }
}
