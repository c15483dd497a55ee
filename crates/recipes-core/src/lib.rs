// # recipes-core
//
// Core library for the stale-while-revalidate recipe catalog cache.
//
// ## Architecture Overview
//
// This library sits between a slow, unreliable remote catalog source and
// a local persisted replica:
//
// - **CatalogStore**: trait for the persisted recipe repository (atomic
//   whole-catalog overwrite, filtered queries, point lookup, last-updated
//   timestamp), with memory and file implementations
// - **RemoteSource**: trait for fetching the full catalog from the network
// - **FreshnessGate**: TTL-based decision of when the local copy is stale
// - **SyncCoordinator**: single-flight background refresh with generation
//   supersession and observable loading/error signals
// - **CachingProvider**: the query facade presentation code talks to;
//   serves local data instantly and revalidates in the background
//
// ## Design Principles
//
// 1. **Stale-while-revalidate**: queries never block on the network; a
//    refresh only improves future reads
// 2. **Single-flight**: at most one refresh in flight, newer requests
//    supersede older ones rather than queueing
// 3. **All-or-nothing replacement**: a refresh either installs the whole
//    new catalog or leaves the old one untouched
// 4. **Explicit state**: the store instance owns the catalog and its
//    timestamp; no process-wide globals

pub mod config;
pub mod error;
pub mod freshness;
pub mod model;
pub mod provider;
pub mod scoring;
pub mod store;
pub mod sync;
pub mod traits;

// Re-export core types for convenience
pub use config::{CacheConfig, RemoteConfig, StoreConfig};
pub use error::{Error, Result};
pub use freshness::FreshnessGate;
pub use model::{
    DifficultyBucket, DurationBucket, FilterQuery, Ingredient, IngredientKind, RawRecipe,
    RecipeStep, StoredRecipe,
};
pub use provider::CachingProvider;
pub use store::{FileCatalogStore, MemoryCatalogStore};
pub use sync::SyncCoordinator;
pub use traits::{CatalogStore, RemoteSource};
