//! Test utilities for routing providers.
//!
//! This module provides [`StubNetworkDistanceProvider`], a deterministic test
//! double for [`NetworkDistanceProvider`] that returns a pre-configured answer
//! without making HTTP requests, and counts the queries it receives.

use std::sync::atomic::{AtomicUsize, Ordering};

use geo::Coord;
use sitescore_core::{NetworkDistanceProvider, RoutingError};

/// Stub `NetworkDistanceProvider` for testing.
///
/// # Example
///
/// ```
/// use geo::Coord;
/// use sitescore_core::NetworkDistanceProvider;
/// use sitescore_data::routing::test_support::StubNetworkDistanceProvider;
///
/// let provider = StubNetworkDistanceProvider::with_miles(0.4);
/// let origin = Coord { x: -84.39, y: 33.75 };
///
/// assert_eq!(provider.walking_distance(origin, origin), Ok(0.4));
/// assert_eq!(provider.calls(), 1);
/// ```
#[derive(Debug)]
pub struct StubNetworkDistanceProvider {
    response: Result<f64, RoutingError>,
    calls: AtomicUsize,
}

impl StubNetworkDistanceProvider {
    /// Create a provider that answers every query with `miles`.
    #[must_use]
    pub const fn with_miles(miles: f64) -> Self {
        Self {
            response: Ok(miles),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a provider that fails every query with `error`.
    #[must_use]
    pub const fn with_error(error: RoutingError) -> Self {
        Self {
            response: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of queries answered so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl NetworkDistanceProvider for StubNetworkDistanceProvider {
    fn walking_distance(
        &self,
        _origin: Coord<f64>,
        _destination: Coord<f64>,
    ) -> Result<f64, RoutingError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.response.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const ORIGIN: Coord<f64> = Coord { x: 0.0, y: 0.0 };

    #[rstest]
    fn with_miles_returns_configured_distance() {
        let provider = StubNetworkDistanceProvider::with_miles(0.75);

        let miles = provider
            .walking_distance(ORIGIN, Coord { x: 0.0, y: 0.01 })
            .expect("should succeed");

        assert_eq!(miles, 0.75);
    }

    #[rstest]
    fn with_error_returns_configured_error() {
        let provider = StubNetworkDistanceProvider::with_error(RoutingError::Timeout {
            url: String::from("http://example.com/route/v1/foot"),
            timeout_secs: 5,
        });

        let err = provider
            .walking_distance(ORIGIN, ORIGIN)
            .expect_err("should fail");

        assert!(matches!(err, RoutingError::Timeout { .. }));
    }

    #[rstest]
    fn counts_every_query() {
        let provider = StubNetworkDistanceProvider::with_error(RoutingError::NoRoute);

        for _ in 0..3 {
            assert!(provider.walking_distance(ORIGIN, ORIGIN).is_err());
        }

        assert_eq!(provider.calls(), 3);
    }
}
