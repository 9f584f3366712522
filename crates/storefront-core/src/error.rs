//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Single-input validation failures               │
//! │  └── FormErrors       - Every failing field of a submitted form        │
//! │                                                                         │
//! │  storefront-db errors                                                  │
//! │  └── DbError          - Storage / session persistence failures         │
//! │                                                                         │
//! │  storefront-remote errors                                              │
//! │  └── RemoteError      - Feed, auth and config failures                 │
//! │                                                                         │
//! │  Console                                                               │
//! │  └── ApiError         - What the user sees (code + message)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No product with this identifier in the collection.
    #[error("Product not found: {0}")]
    ProductNotFound(u64),

    /// No order with this identifier in the collection.
    #[error("Order not found: {0}")]
    OrderNotFound(u64),

    /// No user with this identifier in the collection.
    #[error("User not found: {0}")]
    UserNotFound(u64),

    /// Page navigation outside `1..=total`.
    ///
    /// ## When This Occurs
    /// ```text
    /// 3 pages of results, user asks for page 7
    ///      │
    ///      ▼
    /// PageOutOfRange { page: 7, total: 3 }
    ///      │
    ///      ▼
    /// Current page is left unchanged
    /// ```
    #[error("Page {page} is out of range (1-{total})")]
    PageOutOfRange { page: usize, total: usize },

    /// Admin product form rejected (one entry per failing field).
    #[error("{0}")]
    Form(#[from] FormErrors),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., not a number, not an email address).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Registration password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,
}

impl ValidationError {
    /// Creates a NotAllowed error from any list of displayable options.
    pub fn not_allowed<I, S>(field: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        ValidationError::NotAllowed {
            field: field.into(),
            allowed: allowed.into_iter().map(|s| s.to_string()).collect(),
        }
    }
}

// =============================================================================
// Form Errors
// =============================================================================

/// Fields of the admin product form that carry their own error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormField {
    Name,
    Description,
    Price,
    Stock,
    Category,
    Brand,
    Image,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormField::Name => "name",
            FormField::Description => "description",
            FormField::Price => "price",
            FormField::Stock => "stock",
            FormField::Category => "category",
            FormField::Brand => "brand",
            FormField::Image => "image",
        };
        f.write_str(name)
    }
}

/// All field errors of one form submission.
///
/// Validation never stops at the first failure, so the form can flag every
/// offending input at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<FormField, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the message for a field, replacing any earlier one.
    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Returns the message for a field, if it failed.
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates failing fields in form order.
    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
