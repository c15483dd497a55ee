// # Catalog Store Implementations
//
// This module provides implementations of the CatalogStore trait for
// different persistence strategies.
//
// Both implementations keep the current catalog as an immutable
// `Arc<CatalogSnapshot>` behind a lock: readers clone the Arc under a
// brief read lock and filter outside it, and an overwrite installs a
// fully built replacement snapshot in one swap. Readers therefore see
// either the whole old set or the whole new set, never a mix, and never
// wait on anything longer than the swap itself.

pub mod file;
pub mod memory;

use chrono::{DateTime, Utc};

use crate::model::StoredRecipe;

pub use file::FileCatalogStore;
pub use memory::MemoryCatalogStore;

/// One immutable version of the catalog
#[derive(Debug, Default)]
pub(crate) struct CatalogSnapshot {
    pub recipes: Vec<StoredRecipe>,
    pub last_updated: Option<DateTime<Utc>>,
}
