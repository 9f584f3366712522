//! # storefront-db: Session Persistence for the Storefront
//!
//! Local key-value storage on SQLite, and the session store that keeps the
//! signed-in identity and the cart across console invocations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Data Flow                             │
//! │                                                                         │
//! │  `storefront login` / `storefront cart add 3`                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 storefront-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ SessionStore  │    │ KeyValueStore │    │  Migrations  │  │   │
//! │  │   │ (session.rs)  │───►│   (kv.rs)     │    │  (embedded)  │  │   │
//! │  │   │ user + cart   │    │ LocalStorage  │    │ 001_local_   │  │   │
//! │  │   │               │    │ MemoryStore   │    │  storage.sql │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  └────────────────────────────────┼────────────────────────────────┘   │
//! │                                   ▼                                     │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              SQLite database (storefront.db)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`kv`] - The key-value storage seam and an in-memory store
//! - [`repository`] - SQL repositories
//! - [`session`] - Session store (identity + cart)
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_db::{Database, DbConfig, SessionStore};
//!
//! let db = Database::new(DbConfig::new("storefront.db")).await?;
//! let mut session = SessionStore::open(db.local_storage()).await?;
//! session.add_to_cart(&product).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod kv;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use kv::{KeyValueStore, MemoryStore};
pub use pool::{Database, DbConfig};
pub use repository::local_storage::LocalStorageRepository;
pub use session::SessionStore;
