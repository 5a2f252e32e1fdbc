//! Error types for dnsc
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for dnsc operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for dnsc
#[derive(Error, Debug)]
pub enum Error {
    /// Unparseable record type or malformed caller input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Record type cannot be mutated by the active provider
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// HTTP transport errors (from provider APIs)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a "not implemented" error
    pub fn not_implemented(msg: impl Into<String>) -> Self {
        Self::NotImplemented(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error originated at the provider (auth, transport, API failure)
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            Self::Provider { .. } | Self::Http(_) | Self::Authentication(_)
        )
    }

    /// Whether this error means the requested record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
