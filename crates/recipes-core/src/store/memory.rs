// # Memory Catalog Store
//
// In-memory implementation of CatalogStore.
//
// ## Purpose
//
// Provides a simple, fast catalog store that doesn't persist across
// restarts. Useful for testing and for deployments where re-fetching the
// catalog on startup is acceptable (the freshness gate treats an empty
// store as stale, so the first query triggers a refresh).
//
// ## Crash Behavior
//
// - All recipes are lost on restart/crash
// - First query after restart reports the never-updated sentinel and
//   triggers a refresh

use std::sync::Arc;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::Error;
use crate::model::{FilterQuery, StoredRecipe};
use crate::store::CatalogSnapshot;
use crate::traits::CatalogStore;

/// In-memory catalog store implementation
///
/// The catalog lives in an `Arc<CatalogSnapshot>` behind a RwLock; an
/// overwrite builds the replacement snapshot first and holds the write
/// lock only for the pointer swap.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogStore {
    inner: Arc<RwLock<Arc<CatalogSnapshot>>>,
}

impl MemoryCatalogStore {
    /// Create a new empty memory catalog store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recipes currently stored
    pub async fn len(&self) -> usize {
        self.inner.read().await.recipes.len()
    }

    /// Whether the store holds no recipes
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.recipes.is_empty()
    }

    async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&*self.inner.read().await)
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn last_updated(&self) -> Result<Option<DateTime<Utc>>, Error> {
        Ok(self.snapshot().await.last_updated)
    }

    async fn query(&self, filter: &FilterQuery) -> Result<Vec<StoredRecipe>, Error> {
        let snapshot = self.snapshot().await;
        Ok(snapshot
            .recipes
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<StoredRecipe, Error> {
        let snapshot = self.snapshot().await;
        snapshot
            .recipes
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found(id))
    }

    async fn overwrite(
        &self,
        recipes: Vec<StoredRecipe>,
        updated_at: DateTime<Utc>,
    ) -> Result<(), Error> {
        let next = Arc::new(CatalogSnapshot {
            recipes,
            last_updated: Some(updated_at),
        });
        *self.inner.write().await = next;
        Ok(())
    }
}
