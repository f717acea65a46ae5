//! HTTP-based walking distances from an OSRM routing service.
//!
//! [`HttpNetworkDistanceProvider`] asks the OSRM Route API for the shortest
//! pedestrian route between two coordinates and reports its length in miles.
//! The synchronous [`NetworkDistanceProvider`](sitescore_core::NetworkDistanceProvider)
//! trait is implemented by blocking on the async request internally, so
//! evaluators stay free of async code.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use geo::Coord;
//! use sitescore_core::NetworkDistanceProvider;
//! use sitescore_data::routing::{HttpNetworkDistanceConfig, HttpNetworkDistanceProvider};
//!
//! let config = HttpNetworkDistanceConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(2))
//!     .with_user_agent("site-survey/1.0");
//! let provider = HttpNetworkDistanceProvider::with_config(config)?;
//!
//! let miles = provider.walking_distance(
//!     Coord { x: -84.39, y: 33.75 },
//!     Coord { x: -84.38, y: 33.76 },
//! )?;
//! assert!(miles >= 0.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod osrm;
mod provider;

#[doc(hidden)]
pub mod test_support;

pub use provider::{
    DEFAULT_PROFILE, DEFAULT_USER_AGENT, HttpNetworkDistanceConfig, HttpNetworkDistanceProvider,
    ProviderBuildError,
};
