// # Catalog Store Trait
//
// Defines the interface for the persisted recipe repository.
//
// ## Purpose
//
// The catalog store is the single local replica of the recipe catalog:
// - Answers filter queries and point lookups from local data
// - Replaces the whole catalog atomically on a successful refresh
// - Tracks the timestamp of the last successful overwrite
//
// All mutation goes through `overwrite`; recipes are never updated in
// place and there is no per-recipe incremental write.
//
// ## Implementations
//
// - In-memory: `MemoryCatalogStore` (testing, ephemeral deployments)
// - File-based: `FileCatalogStore` (JSON state file, crash recovery)

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::{FilterQuery, StoredRecipe};

/// Trait for catalog store implementations
///
/// Implementations must be thread-safe and usable across async tasks.
/// Readers must never observe a partially replaced catalog: a `query`
/// concurrent with an `overwrite` sees either the full old set or the
/// full new set. Queries must not block behind an in-progress refresh
/// beyond the brief moment of replacement.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Timestamp of the last successful overwrite
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ts))`: the catalog was last replaced at `ts`
    /// - `Ok(None)`: never updated; freshness checks must treat this as
    ///   older than any real timestamp
    /// - `Err(Error)`: storage error
    async fn last_updated(&self) -> Result<Option<DateTime<Utc>>, crate::Error>;

    /// All recipes matching the filter (title prefix AND difficulty
    /// bucket AND duration bucket)
    async fn query(&self, filter: &FilterQuery) -> Result<Vec<StoredRecipe>, crate::Error>;

    /// Point lookup by identifier
    ///
    /// # Returns
    ///
    /// - `Ok(StoredRecipe)`: the recipe
    /// - `Err(Error::RecipeNotFound)`: no such id
    /// - `Err(Error)`: storage error
    async fn get_by_id(&self, id: &str) -> Result<StoredRecipe, crate::Error>;

    /// Atomically replace the entire catalog and its timestamp
    ///
    /// Deletes the prior set and installs `recipes` plus `updated_at` as
    /// one operation. On failure the prior set and timestamp are left
    /// fully intact.
    async fn overwrite(
        &self,
        recipes: Vec<StoredRecipe>,
        updated_at: DateTime<Utc>,
    ) -> Result<(), crate::Error>;
}
