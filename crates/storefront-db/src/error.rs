//! # Storage Error Types
//!
//! Everything that can go wrong between the session and the SQLite file.
//!
//! ```text
//! sqlx::Error ────────────┐
//! MigrateError ───────────┼──► DbError ──► ApiError (console: DATABASE_ERROR)
//! serde_json::Error ──────┘
//! ```
//!
//! A missing key is not an error: [`KeyValueStore::get`](crate::KeyValueStore::get)
//! returns `None`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// The database file (or its directory) could not be created or opened.
    #[error("Cannot open {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A statement against `local_storage` failed.
    #[error("Storage query failed: {0}")]
    Query(String),

    /// A session value could not be encoded.
    #[error("Session value could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),

    /// Every pooled connection stayed busy past the acquire timeout.
    #[error("Storage busy: timed out waiting for a connection")]
    Busy,

    /// The pool was closed (after [`Database::close`](crate::Database::close)).
    #[error("Storage is closed")]
    Closed,
}

impl DbError {
    pub(crate) fn open(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DbError::Open {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => DbError::Busy,
            sqlx::Error::PoolClosed => DbError::Closed,
            sqlx::Error::Database(db_err) => DbError::Query(db_err.message().to_string()),
            other => DbError::Query(other.to_string()),
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;
