//! Error types for the Isilon backend.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised by the Isilon backend.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum IsilonBackendError {
    /// Raised when the high-level configuration is incomplete.
    #[error("configuration error: {0}")]
    Config(String),
    /// Raised when the HTTP request cannot be sent or its body read.
    #[error("failed to reach platform API during {operation}: {message}")]
    Transport {
        /// Operation being attempted.
        operation: &'static str,
        /// Message returned by the HTTP client.
        message: String,
    },
    /// Raised when the Platform API rejects a request.
    #[error("{operation} failed with HTTP {status}: {message}")]
    Api {
        /// Operation being attempted.
        operation: &'static str,
        /// HTTP status code.
        status: u16,
        /// Error message returned by the API.
        message: String,
    },
    /// Raised when a successful response body cannot be parsed.
    #[error("unexpected {operation} response: {message}")]
    Decode {
        /// Operation being attempted.
        operation: &'static str,
        /// Parser error message.
        message: String,
    },
    /// Raised when an export conflicts but no matching export can be found.
    #[error("export for {path} in zone {zone} conflicts but could not be found")]
    ExportNotFound {
        /// Exported directory.
        path: String,
        /// Access zone searched.
        zone: String,
    },
}

impl From<ConfigError> for IsilonBackendError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value.to_string())
    }
}
