//! # Remote Error Types
//!
//! Error types for the feed, auth and configuration boundary.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Remote Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Auth                │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  RequestFailed  │  │  InvalidCredentials     │ │
//! │  │  InvalidUrl     │  │  BadStatus      │  │  Validation             │ │
//! │  │  ConfigLoad/Save│  │  Decode         │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Transport errors never reach the shopper directly: the catalog service
//! degrades each failing source and reports a single banner instead.

use storefront_core::ValidationError;
use thiserror::Error;

/// Result type alias for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

#[derive(Debug, Error)]
pub enum RemoteError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid storefront configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid API base URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never produced a response (DNS, connect, timeout).
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The server answered with a non-success status.
    #[error("Unexpected HTTP status {status} from {url}")]
    BadStatus { status: u16, url: String },

    /// The response body was not the expected JSON.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    // =========================================================================
    // Auth Errors
    // =========================================================================
    /// Sign-in rejected. Deliberately says nothing about which field was wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Registration input rejected.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Storage failure surfaced through this layer.
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return RemoteError::Decode(err.to_string());
        }
        match err.status() {
            Some(status) => RemoteError::BadStatus {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            },
            None => RemoteError::RequestFailed(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for RemoteError {
    fn from(err: url::ParseError) -> Self {
        RemoteError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for RemoteError {
    fn from(err: std::io::Error) -> Self {
        RemoteError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for RemoteError {
    fn from(err: toml::de::Error) -> Self {
        RemoteError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for RemoteError {
    fn from(err: toml::ser::Error) -> Self {
        RemoteError::ConfigSaveFailed(err.to_string())
    }
}

impl From<storefront_db::DbError> for RemoteError {
    fn from(err: storefront_db::DbError) -> Self {
        RemoteError::Database(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl RemoteError {
    /// True for failures of a single feed request, which the catalog degrades
    /// to an empty source instead of propagating.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            RemoteError::RequestFailed(_) | RemoteError::BadStatus { .. } | RemoteError::Decode(_)
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            RemoteError::InvalidConfig(_)
                | RemoteError::InvalidUrl(_)
                | RemoteError::ConfigLoadFailed(_)
                | RemoteError::ConfigSaveFailed(_)
        )
    }
}
