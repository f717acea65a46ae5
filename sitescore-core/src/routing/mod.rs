//! Walking distances along a road network.
//!
//! The [`NetworkDistanceProvider`] trait hides the external road-graph
//! service that answers pedestrian routing queries. Callers pass two WGS84
//! coordinates and receive a distance in miles. Every failure surfaces as a
//! [`RoutingError`]; evaluators treat any error as "unavailable" and fall
//! back to straight-line distance.

mod error;
mod provider;

pub use error::RoutingError;
pub use provider::NetworkDistanceProvider;
