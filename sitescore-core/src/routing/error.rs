use thiserror::Error;

/// Errors from [`crate::routing::NetworkDistanceProvider::walking_distance`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The routing request exceeded its timeout.
    #[error("routing request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout in whole seconds.
        timeout_secs: u64,
    },
    /// The service could not be reached.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Transport error message.
        message: String,
    },
    /// The service answered with a non-success HTTP status.
    #[error("routing service at {url} returned HTTP {status}: {message}")]
    Http {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error message reported by the client.
        message: String,
    },
    /// The service answered with an application-level error code.
    #[error("routing service error {code}: {message}")]
    Service {
        /// Service status code, e.g. `NoSegment`.
        code: String,
        /// Human-readable message.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse routing response: {message}")]
    Parse {
        /// Decoder error message.
        message: String,
    },
    /// The service found no route between the coordinates.
    #[error("no walking route between the requested coordinates")]
    NoRoute,
    /// The service returned a negative or non-finite distance.
    #[error("routing service returned invalid distance {metres} m")]
    InvalidDistance {
        /// Raw distance in metres, formatted for display.
        metres: String,
    },
}
