//! Core traits for the recipe cache
//!
//! This module defines the two fixed interfaces the engine is built on.
//!
//! - [`CatalogStore`]: persisted repository of recipes
//! - [`RemoteSource`]: full-catalog fetch from the network

pub mod catalog_store;
pub mod remote_source;

pub use catalog_store::CatalogStore;
pub use remote_source::RemoteSource;
