//! Data-source adapters for the site-scoring engine.
//!
//! The [`routing`] module answers walking-distance queries against an OSRM
//! routing service, implementing
//! [`sitescore_core::NetworkDistanceProvider`].

#![forbid(unsafe_code)]

pub mod routing;

pub use routing::{
    DEFAULT_PROFILE, DEFAULT_USER_AGENT, HttpNetworkDistanceConfig, HttpNetworkDistanceProvider,
    ProviderBuildError,
};
