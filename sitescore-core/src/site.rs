//! Candidate sites scored by the engine.

use geo::{Coord, Point};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A geographic point proposed for development.
///
/// Coordinates are WGS84 decimal degrees. Internally the engine works with
/// [`Coord`] values where `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use sitescore_core::Site;
///
/// let site = Site::new(33.749, -84.388)?;
/// assert_eq!(site.coord().x, -84.388);
/// assert_eq!(site.coord().y, 33.749);
/// # Ok::<(), sitescore_core::SiteError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Site {
    latitude: f64,
    longitude: f64,
}

/// Errors returned by [`Site::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SiteError {
    /// Latitude was not finite or outside `-90.0..=90.0`.
    #[error("latitude {0} is outside -90..=90")]
    InvalidLatitude(f64),
    /// Longitude was not finite or outside `-180.0..=180.0`.
    #[error("longitude {0} is outside -180..=180")]
    InvalidLongitude(f64),
}

impl Site {
    /// Validate and construct a [`Site`].
    ///
    /// # Errors
    /// Returns [`SiteError`] when either coordinate is non-finite or out of
    /// range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, SiteError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(SiteError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(SiteError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// The site as a `geo` coordinate (`x = longitude`, `y = latitude`).
    #[must_use]
    pub const fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }

    /// The site as a `geo` point.
    #[must_use]
    pub fn point(&self) -> Point<f64> {
        Point::from(self.coord())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(90.0, 180.0)]
    #[case(-90.0, -180.0)]
    #[case(33.7, -84.4)]
    fn accepts_valid_coordinates(#[case] lat: f64, #[case] lon: f64) {
        assert!(Site::new(lat, lon).is_ok());
    }

    #[rstest]
    #[case(90.1)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn rejects_invalid_latitude(#[case] lat: f64) {
        assert!(matches!(
            Site::new(lat, 0.0),
            Err(SiteError::InvalidLatitude(_))
        ));
    }

    #[rstest]
    #[case(-180.5)]
    #[case(f64::NEG_INFINITY)]
    fn rejects_invalid_longitude(#[case] lon: f64) {
        assert!(matches!(
            Site::new(0.0, lon),
            Err(SiteError::InvalidLongitude(_))
        ));
    }

    #[rstest]
    fn coord_uses_lon_lat_axis_order() {
        let site = Site::new(10.0, 20.0).expect("valid site");
        assert_eq!(site.coord(), Coord { x: 20.0, y: 10.0 });
    }
}
