//! Caching recipe provider
//!
//! The public entry point for presentation code. Every query serves the
//! best currently available local data immediately; when the catalog is
//! stale the provider kicks off a background refresh as a side effect,
//! so callers never block on the network (stale-while-revalidate).

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

use crate::Error;
use crate::freshness::FreshnessGate;
use crate::model::{FilterQuery, StoredRecipe};
use crate::sync::SyncCoordinator;
use crate::traits::{CatalogStore, RemoteSource};

/// Stale-while-revalidate facade over a catalog store and remote source
///
/// Construct once and share; all state lives in the store and the
/// coordinator, there are no ambient globals.
pub struct CachingProvider {
    store: Arc<dyn CatalogStore>,
    gate: FreshnessGate,
    coordinator: SyncCoordinator,
}

impl CachingProvider {
    /// Create a provider with a cache-validity TTL in seconds
    pub fn new(store: Arc<dyn CatalogStore>, remote: Arc<dyn RemoteSource>, ttl_secs: u64) -> Self {
        Self {
            coordinator: SyncCoordinator::new(remote, Arc::clone(&store)),
            gate: FreshnessGate::new(ttl_secs),
            store,
        }
    }

    /// Query the catalog, refreshing it in the background if stale
    ///
    /// Always returns the store's current contents for the filter; the
    /// refresh, if one is triggered, only affects future queries.
    pub async fn fetch(&self, filter: &FilterQuery) -> Result<Vec<StoredRecipe>, Error> {
        let last_updated = self.store.last_updated().await?;
        if self.gate.is_stale(last_updated, Utc::now()) {
            debug!(?last_updated, "catalog stale, requesting refresh");
            self.coordinator.request_refresh();
        }
        self.store.query(filter).await
    }

    /// Point lookup by id; never triggers a refresh
    pub async fn get_by_id(&self, id: &str) -> Result<StoredRecipe, Error> {
        self.store.get_by_id(id).await
    }

    /// Force a refresh regardless of freshness (explicit refresh gesture)
    pub fn request_refresh(&self) {
        self.coordinator.request_refresh();
    }

    /// Observe whether a refresh is in flight
    pub fn is_loading(&self) -> watch::Receiver<bool> {
        self.coordinator.is_loading()
    }

    /// Observe the most recent refresh error
    pub fn last_error(&self) -> watch::Receiver<Option<Error>> {
        self.coordinator.last_error()
    }

    /// The loading signal as an async stream
    pub fn loading_stream(&self) -> WatchStream<bool> {
        WatchStream::new(self.coordinator.is_loading())
    }

    /// The error signal as an async stream
    pub fn error_stream(&self) -> WatchStream<Option<Error>> {
        WatchStream::new(self.coordinator.last_error())
    }
}
