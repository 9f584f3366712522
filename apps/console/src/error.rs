//! # API Error Type
//!
//! Unified error type for console commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Console                            │
//! │                                                                         │
//! │  Command Function  ── Result<T, ApiError>                               │
//! │         │                                                               │
//! │         ├── DbError ────────── storage failure ──────────┐              │
//! │         ├── CoreError ──────── page out of range ────────┤              │
//! │         ├── FormErrors ─────── one line per field ───────┼──► ApiError │
//! │         ├── RemoteError ────── "Invalid credentials" ────┤              │
//! │         └── access gate ────── sign in / admin only ─────┘              │
//! │                                                                         │
//! │  run() prints `error: <message>` to stderr and exits non-zero.          │
//! │  With --json the error is printed as { "code": ..., "message": ... }.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use storefront_core::{CoreError, FormErrors, ValidationError};
use storefront_db::DbError;
use storefront_remote::RemoteError;

/// Error returned from every console command.
///
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "price: Valid price is required"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// No signed-in user
    Unauthorized,

    /// Signed in, but not allowed
    Forbidden,

    /// Local storage failed
    DatabaseError,

    /// Feed, auth or config boundary failed
    RemoteError,

    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized() -> Self {
        ApiError::new(ErrorCode::Unauthorized, "Please sign in first (storefront login)")
    }

    pub fn forbidden() -> Self {
        ApiError::new(ErrorCode::Forbidden, "Admin access required")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Open { .. } | DbError::Migration(_) => {
                tracing::error!(error = %err, "Session database unavailable");
                ApiError::new(ErrorCode::DatabaseError, err.to_string())
            }
            DbError::Query(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Storage query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Could not save session")
            }
            DbError::Encode(e) => {
                tracing::error!("Session encoding failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Could not save session")
            }
            DbError::Busy => ApiError::new(
                ErrorCode::DatabaseError,
                "Session database is busy, try again",
            ),
            DbError::Closed => ApiError::internal("Session database already closed"),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", id),
            CoreError::OrderNotFound(id) => ApiError::not_found("Order", id),
            CoreError::UserNotFound(id) => ApiError::not_found("User", id),
            CoreError::PageOutOfRange { .. } => ApiError::validation(err.to_string()),
            CoreError::Form(errors) => errors.into(),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<FormErrors> for ApiError {
    fn from(errors: FormErrors) -> Self {
        let lines: Vec<String> = errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        ApiError::validation(lines.join("\n"))
    }
}

impl From<RemoteError> for ApiError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::InvalidCredentials => {
                ApiError::new(ErrorCode::Unauthorized, err.to_string())
            }
            RemoteError::Validation(e) => e.into(),
            other if other.is_config_error() => ApiError::validation(other.to_string()),
            other => ApiError::new(ErrorCode::RemoteError, other.to_string()),
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::internal(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::internal(format!("Failed to render output: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}
