//! Error types for lottery statistics requests.
//!
//! Every failure a request can produce is returned as a [`LottoError`]; nothing
//! in the crate panics on bad input from the network. The session controller
//! renders these errors into its `Failed` lifecycle state via `Display`.
//!
//! ## Error Categories
//!
//! - **Invalid Endpoint**: The request URL could not be built
//! - **Transport Failure**: Connection refused, DNS failure, timeout
//! - **Server Error**: Non-success status, or an envelope reporting `success: false`
//! - **Malformed Response**: A 2xx body that does not match the expected shape
//! - **Configuration**: Problems loading a [`ClientConfig`](crate::ClientConfig)
//!
//! ## Recovery
//!
//! Nothing is retried automatically, but errors can tell a display layer
//! whether offering a retry makes sense:
//!
//! ```rust
//! use lotto_stats::LottoError;
//!
//! let error = LottoError::transport_failure("connection refused");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use thiserror::Error;

/// Result type alias for lottery statistics operations.
pub type Result<T, E = LottoError> = std::result::Result<T, E>;

/// Main error type for lottery statistics operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LottoError {
    #[error("Invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Network request failed: {reason}")]
    TransportFailure {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Server error: {message}")]
    ServerError { message: String },

    #[error("Malformed response: {detail}")]
    MalformedResponse { detail: String },

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },
}

impl LottoError {
    /// Returns whether repeating the same request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            LottoError::TransportFailure { .. } => true,
            LottoError::ServerError { .. } => true,
            LottoError::InvalidEndpoint { .. } => false,
            LottoError::MalformedResponse { .. } => false,
            LottoError::Configuration { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            LottoError::InvalidEndpoint { .. } => {
                vec!["Check the configured base URL", "Verify the base URL uses http or https"]
            }
            LottoError::TransportFailure { .. } => vec![
                "Check the network connection",
                "Verify the statistics service is running",
                "Increase the request timeout",
            ],
            LottoError::ServerError { .. } => {
                vec!["Try again later", "Check the statistics service logs"]
            }
            LottoError::MalformedResponse { .. } => vec![
                "Check that client and service versions match",
                "Verify the service returns the documented JSON shape",
            ],
            LottoError::Configuration { .. } => {
                vec!["Check the configuration file syntax", "Verify the base URL and page size"]
            }
        }
    }

    /// Helper constructor for endpoint construction errors.
    pub fn invalid_endpoint(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        LottoError::InvalidEndpoint { endpoint: endpoint.into(), reason: reason.into() }
    }

    /// Helper constructor for transport failures.
    pub fn transport_failure(reason: impl Into<String>) -> Self {
        LottoError::TransportFailure { reason: reason.into(), source: None }
    }

    /// Helper constructor for transport failures with source.
    pub fn transport_failure_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        LottoError::TransportFailure { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for server errors.
    pub fn server_error(message: impl Into<String>) -> Self {
        LottoError::ServerError { message: message.into() }
    }

    /// Helper constructor for decode failures.
    pub fn malformed_response(detail: impl Into<String>) -> Self {
        LottoError::MalformedResponse { detail: detail.into() }
    }

    /// Helper constructor for configuration errors.
    pub fn configuration(reason: impl Into<String>) -> Self {
        LottoError::Configuration { reason: reason.into() }
    }
}

impl From<reqwest::Error> for LottoError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            let endpoint = err.url().map(|url| url.to_string()).unwrap_or_default();
            return LottoError::InvalidEndpoint { endpoint, reason: err.to_string() };
        }

        let reason = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "could not connect to service".to_string()
        } else {
            err.to_string()
        };
        LottoError::TransportFailure { reason, source: Some(Box::new(err)) }
    }
}

impl From<url::ParseError> for LottoError {
    fn from(err: url::ParseError) -> Self {
        LottoError::Configuration { reason: format!("invalid base URL: {}", err) }
    }
}
