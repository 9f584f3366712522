//! # Repository Module
//!
//! SQL-backed repositories. Each one owns a clone of the pool and keeps its
//! SQL in one place.
//!
//! ## Available Repositories
//!
//! - [`local_storage::LocalStorageRepository`] - Key-value rows of `local_storage`

pub mod local_storage;
