//! HTTP-based `NetworkDistanceProvider` using OSRM's Route API.
//!
//! The [`NetworkDistanceProvider`] trait is synchronous so evaluators can run
//! on plain worker threads. This provider bridges the async HTTP call to the
//! sync interface by blocking on a Tokio runtime internally.

use std::time::Duration;

use geo::Coord;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sitescore_core::geo_math::MILES_PER_METRE;
use sitescore_core::{NetworkDistanceProvider, RoutingError};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::osrm::RouteResponse;

/// Error type for [`HttpNetworkDistanceProvider`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Default user agent for OSRM requests.
pub const DEFAULT_USER_AGENT: &str = "sitescore-routing/0.1";

/// Default OSRM routing profile.
pub const DEFAULT_PROFILE: &str = "foot";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Configuration for [`HttpNetworkDistanceProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpNetworkDistanceConfig {
    /// Base URL for the OSRM service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// OSRM profile used for routing, `foot` unless overridden.
    pub profile: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpNetworkDistanceConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("http://localhost:5000"),
            profile: String::from(DEFAULT_PROFILE),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: String::from(DEFAULT_USER_AGENT),
        }
    }
}

impl HttpNetworkDistanceConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the routing profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// HTTP-based walking-distance provider using the OSRM Route API.
///
/// It owns a Tokio runtime reused across calls. Every request is bounded by
/// the configured timeout, so a slow routing service costs each transit
/// candidate at most that long before the evaluator falls back to
/// straight-line distance.
///
/// # Runtime behaviour
///
/// When called from outside any Tokio runtime, the provider uses its own
/// stored runtime. When called from within a multi-threaded Tokio runtime
/// (detected via [`Handle::try_current()`] and
/// [`RuntimeFlavor::MultiThread`]), it uses that runtime's handle with
/// [`tokio::task::block_in_place`] to avoid nested runtime panics. Inside a
/// `current_thread` runtime it falls back to its own runtime.
pub struct HttpNetworkDistanceProvider {
    client: Client,
    config: HttpNetworkDistanceConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpNetworkDistanceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpNetworkDistanceProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpNetworkDistanceProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpNetworkDistanceConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpNetworkDistanceConfig) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        // Shared by every grid worker; requests from different workers run
        // concurrently.
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// The provider's configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpNetworkDistanceConfig {
        &self.config
    }

    /// Build the OSRM Route API URL between two coordinates.
    ///
    /// The URL format is
    /// `{base_url}/route/v1/{profile}/{lon},{lat};{lon},{lat}?overview=false`.
    fn build_route_url(&self, origin: Coord<f64>, destination: Coord<f64>) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=false",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            origin.x,
            origin.y,
            destination.x,
            destination.y
        )
    }

    async fn fetch_distance_async(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<f64, RoutingError> {
        let url = self.build_route_url(origin, destination);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        let route_response: RouteResponse =
            response.json().await.map_err(|err| RoutingError::Parse {
                message: err.to_string(),
            })?;

        convert_response(route_response)
    }

    /// Convert a reqwest error to a `RoutingError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> RoutingError {
        if error.is_timeout() {
            return RoutingError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return RoutingError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        RoutingError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Convert an OSRM response to a distance in miles.
fn convert_response(response: RouteResponse) -> Result<f64, RoutingError> {
    if response.is_no_route() {
        return Err(RoutingError::NoRoute);
    }
    if !response.is_ok() {
        return Err(RoutingError::Service {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }

    let route = response
        .routes
        .and_then(|routes| routes.into_iter().next())
        .ok_or(RoutingError::NoRoute)?;
    let metres = route.distance.ok_or_else(|| RoutingError::Parse {
        message: String::from("OSRM route missing distance"),
    })?;
    metres_to_miles(metres)
}

#[expect(clippy::float_arithmetic, reason = "unit conversion from metres to miles")]
fn metres_to_miles(metres: f64) -> Result<f64, RoutingError> {
    if !metres.is_finite() || metres < 0.0 {
        return Err(RoutingError::InvalidDistance {
            metres: metres.to_string(),
        });
    }
    Ok(metres * MILES_PER_METRE)
}

impl NetworkDistanceProvider for HttpNetworkDistanceProvider {
    /// Fetch the walking distance between two coordinates.
    ///
    /// # Runtime requirements
    ///
    /// When called from within an existing Tokio runtime, the runtime should
    /// be multi-threaded. Inside a `current_thread` runtime the provider
    /// blocks on its own runtime, which may stall the caller's runtime.
    fn walking_distance(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<f64, RoutingError> {
        let future = self.fetch_distance_async(origin, destination);
        let result = match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        };
        if let Err(err) = &result {
            log::debug!(
                "walking distance ({}, {}) -> ({}, {}) failed: {err}",
                origin.y,
                origin.x,
                destination.y,
                destination.x
            );
        }
        result
    }
}
