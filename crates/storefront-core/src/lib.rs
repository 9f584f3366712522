//! # storefront-core: Pure Business Logic for the Storefront
//!
//! Every rule the storefront applies to its data lives here as plain,
//! synchronous functions over in-memory collections.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Storefront Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/console (`storefront` CLI)                 │   │
//! │  │   products ──► cart ──► login/logout ──► admin tables/export    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │  │ catalog │ │  cart   │ │validation│ │  table  │ │ export  │  │   │
//! │  │  │ filter  │ │snapshots│ │ProductFm │ │ search  │ │  CSV    │  │   │
//! │  │  │ sort    │ │ totals  │ │ creds    │ │ select  │ │ quoting │  │   │
//! │  │  │ pages   │ │         │ │          │ │ bulk    │ │         │  │   │
//! │  │  └─────────┘ └─────────┘ └──────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │    storefront-db (session)      storefront-remote (services)    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Identity, User, Order, ...)
//! - [`money`] - Money type with integer cents
//! - [`catalog`] - Filter / sort / paginate engine and page-number list
//! - [`cart`] - Ordered cart of product snapshots
//! - [`validation`] - Admin product form and input validators
//! - [`table`] - Searchable, sortable, multi-select table views
//! - [`export`] - CSV rendering with field quoting
//! - [`stats`] - Dashboard figures derived from collections
//! - [`access`] - Route gating from the current identity
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::catalog::{page_numbers, PageMarker};
//!
//! let pages = page_numbers(5, 10);
//! assert_eq!(pages[0], PageMarker::Page(1));
//! assert_eq!(pages[1], PageMarker::Ellipsis);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod access;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod export;
pub mod money;
pub mod stats;
pub mod table;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use catalog::{CatalogQuery, CatalogView, CategoryFilter, PageMarker, SortKey};
pub use error::{CoreError, CoreResult, FormErrors, FormField, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of products shown per catalog page until the shopper picks another size.
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Page sizes offered by the catalog page-size selector.
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [4, 8, 12, 16, 20];

/// Page buttons shown before the page-number list collapses into ellipses.
pub const MAX_VISIBLE_PAGES: usize = 5;

/// Rating given to products created through the admin form.
pub const DEFAULT_RATING: f64 = 4.0;

/// Products rated at or above this are featured when ingested from the feed.
pub const FEATURED_RATING_THRESHOLD: f64 = 4.5;

/// Longest accepted free-text search query.
pub const MAX_SEARCH_QUERY_LEN: usize = 100;

/// Sentinel used by every category selector for "no category filter".
pub const ALL_CATEGORIES: &str = "all";
