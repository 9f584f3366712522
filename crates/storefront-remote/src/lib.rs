//! # storefront-remote: Backend Boundary
//!
//! Everything the storefront would ask a server for: the product catalog
//! (DummyJSON over HTTP), sign-in and registration (mocked), and the admin
//! dashboard's collections (demo data).
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        storefront-remote                                │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │  CatalogService  │  │   AuthService    │  │  AdminDataService    │  │
//! │  │  RemoteCatalog<F>│  │  MockAuthService │  │  MockAdminData       │  │
//! │  └────────┬─────────┘  └────────┬─────────┘  └──────────┬───────────┘  │
//! │           │ F: ProductFeed      │ AuthSettings          │              │
//! │           ▼                     ▼                       ▼              │
//! │   DummyJsonFeed (reqwest)   configured admin pair   fixtures.rs        │
//! │                                                                         │
//! │  StorefrontConfig (config.rs) feeds all three                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use storefront_remote::{CatalogService, RemoteCatalog, StorefrontConfig};
//!
//! let config = StorefrontConfig::load(None)?;
//! let catalog = RemoteCatalog::dummy_json(&config.api, config.catalog.clone())?;
//! let load = catalog.fetch_products().await;
//! if let Some(banner) = &load.banner {
//!     eprintln!("{banner}");
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod orders;

// =============================================================================
// Re-exports
// =============================================================================

pub use auth::{AuthService, MockAuthService};
pub use catalog::{
    CatalogLoad, CatalogService, DummyJsonFeed, FeedProduct, FeedSource, ProductFeed,
    RemoteCatalog, SourceFailure, FALLBACK_BANNER,
};
pub use config::StorefrontConfig;
pub use error::{RemoteError, RemoteResult};
pub use orders::{AdminDataService, MockAdminData};
