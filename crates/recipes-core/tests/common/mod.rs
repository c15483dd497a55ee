//! Test doubles and common utilities for the cache contract tests
//!
//! The doubles are call-counting fakes: the remote source plays back a
//! script of delayed responses, and the counting store wraps the real
//! in-memory store so tests can assert how many overwrites landed and
//! force write failures.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use recipes_core::error::{Error, Result};
use recipes_core::model::{FilterQuery, RawRecipe, RecipeStep, StoredRecipe};
use recipes_core::store::MemoryCatalogStore;
use recipes_core::traits::{CatalogStore, RemoteSource};
use tokio::sync::watch;

/// One scripted response for [`ScriptedRemoteSource`]
pub struct ScriptedFetch {
    /// How long the fetch takes before resolving
    pub delay: Duration,
    /// What it resolves to
    pub result: Result<Vec<RawRecipe>>,
}

impl ScriptedFetch {
    pub fn ok_after(delay: Duration, recipes: Vec<RawRecipe>) -> Self {
        Self {
            delay,
            result: Ok(recipes),
        }
    }

    pub fn err_after(delay: Duration, error: Error) -> Self {
        Self {
            delay,
            result: Err(error),
        }
    }
}

/// A remote source that plays back scripted responses in order
///
/// Each `fetch_all` call pops the next scripted response, sleeps its
/// delay and resolves. Calls beyond the script fail, so tests catch
/// unexpected fetches.
pub struct ScriptedRemoteSource {
    script: Arc<std::sync::Mutex<VecDeque<ScriptedFetch>>>,
    fetch_call_count: Arc<AtomicUsize>,
}

impl ScriptedRemoteSource {
    pub fn new(script: Vec<ScriptedFetch>) -> Self {
        Self {
            script: Arc::new(std::sync::Mutex::new(script.into())),
            fetch_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times fetch_all() was called
    pub fn fetch_call_count(&self) -> usize {
        self.fetch_call_count.load(Ordering::SeqCst)
    }

    /// Create a ScriptedRemoteSource that shares script and counters
    /// with an existing one
    pub fn sharing_with(other: &Self) -> Self {
        Self {
            script: Arc::clone(&other.script),
            fetch_call_count: Arc::clone(&other.fetch_call_count),
        }
    }
}

#[async_trait::async_trait]
impl RemoteSource for ScriptedRemoteSource {
    async fn fetch_all(&self) -> Result<Vec<RawRecipe>> {
        self.fetch_call_count.fetch_add(1, Ordering::SeqCst);

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(fetch) => {
                tokio::time::sleep(fetch.delay).await;
                fetch.result
            }
            None => Err(Error::network("scripted source exhausted")),
        }
    }
}

/// A catalog store that wraps the in-memory store and tracks overwrites
pub struct CountingStore {
    inner: MemoryCatalogStore,
    overwrite_call_count: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryCatalogStore::new(),
            overwrite_call_count: Arc::new(AtomicUsize::new(0)),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Number of overwrites that were attempted
    pub fn overwrite_call_count(&self) -> usize {
        self.overwrite_call_count.load(Ordering::SeqCst)
    }

    /// Make every subsequent overwrite fail with StorageWriteFailed
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Create a CountingStore that shares data and counters with an
    /// existing one
    pub fn sharing_with(other: &Self) -> Self {
        Self {
            inner: other.inner.clone(),
            overwrite_call_count: Arc::clone(&other.overwrite_call_count),
            fail_writes: Arc::clone(&other.fail_writes),
        }
    }
}

#[async_trait::async_trait]
impl CatalogStore for CountingStore {
    async fn last_updated(&self) -> Result<Option<DateTime<Utc>>> {
        self.inner.last_updated().await
    }

    async fn query(&self, filter: &FilterQuery) -> Result<Vec<StoredRecipe>> {
        self.inner.query(filter).await
    }

    async fn get_by_id(&self, id: &str) -> Result<StoredRecipe> {
        self.inner.get_by_id(id).await
    }

    async fn overwrite(
        &self,
        recipes: Vec<StoredRecipe>,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        self.overwrite_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::storage_write("simulated write failure"));
        }
        self.inner.overwrite(recipes, updated_at).await
    }
}

/// Build a raw recipe with the given title and a fixed shape
pub fn raw_recipe(title: &str, steps: usize, timer_minutes: u32) -> RawRecipe {
    RawRecipe {
        name: title.to_string(),
        ingredients: Vec::new(),
        steps: (0..steps).map(|i| format!("step {}", i)).collect(),
        timers: vec![timer_minutes; steps],
        image_url: format!("https://example.com/{}.jpg", title.to_lowercase()),
        original_url: None,
    }
}

/// Build a raw catalog from titles, each with one 5-minute step
pub fn raw_set(titles: &[&str]) -> Vec<RawRecipe> {
    titles.iter().map(|t| raw_recipe(t, 1, 5)).collect()
}

/// Build a stored recipe directly, for seeding stores without a fetch
pub fn stored_recipe(title: &str) -> StoredRecipe {
    StoredRecipe {
        id: title.to_lowercase().replace(' ', "-"),
        title: title.to_string(),
        image_url: format!("https://example.com/{}.jpg", title.to_lowercase()),
        original_url: None,
        ingredients: Vec::new(),
        steps: vec![RecipeStep {
            instruction: "cook".to_string(),
            timer_minutes: 5,
        }],
        difficulty_score: 0.0,
    }
}

/// Titles of a query result, for easy assertions
pub fn titles(recipes: &[StoredRecipe]) -> Vec<String> {
    recipes.iter().map(|r| r.title.clone()).collect()
}

/// Wait until the loading signal settles to false (bounded at 2s)
pub async fn wait_until_idle(mut loading: watch::Receiver<bool>) {
    let settled = tokio::time::timeout(Duration::from_secs(2), async {
        while *loading.borrow_and_update() {
            if loading.changed().await.is_err() {
                break;
            }
        }
    })
    .await;
    assert!(settled.is_ok(), "refresh did not settle within 2s");
}
