//! Background refresh coordination
//!
//! The [`SyncCoordinator`] owns the single-flight refresh cycle:
//!
//! ```text
//! ┌──────────────┐    fetch_all     ┌──────────────┐
//! │ RemoteSource │─── RawRecipe ───▶│ Coordinator  │
//! └──────────────┘                  └──────────────┘
//!                                          │ score + assign ids
//!                                          ▼
//!                                   ┌──────────────┐
//!                                   │ CatalogStore │ overwrite
//!                                   └──────────────┘
//! ```
//!
//! At most one refresh is live at a time. A new `request_refresh` call
//! supersedes the previous one: the prior task is aborted (best-effort
//! transport cancellation) and its generation tag is invalidated, so a
//! result that slips past the abort is discarded without touching the
//! catalog or the status signals. Overwrites therefore apply in
//! increasing generation order regardless of network completion order.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::Error;
use crate::model::{RawRecipe, RecipeStep, StoredRecipe};
use crate::scoring::difficulty_scores;
use crate::traits::{CatalogStore, RemoteSource};

/// Single-flight background refresh coordinator
///
/// Exposes two continuously observable signals:
/// - `is_loading`: whether a refresh is in flight
/// - `last_error`: the most recent refresh failure, cleared by the next
///   successful refresh (not on read)
///
/// The signals are owned exclusively by the coordinator; observers hold
/// `watch::Receiver`s and cannot mutate them.
pub struct SyncCoordinator {
    inner: Arc<Inner>,
    /// Previous in-flight refresh task, aborted on supersession
    in_flight: std::sync::Mutex<Option<JoinHandle<()>>>,
}

struct Inner {
    remote: Arc<dyn RemoteSource>,
    store: Arc<dyn CatalogStore>,
    /// Monotonically increasing refresh generation
    generation: AtomicU64,
    /// Serializes the check-then-overwrite commit step so overwrites land
    /// in generation order even if two tasks briefly overlap
    commit: Mutex<()>,
    /// Held across the generation bump in `request_refresh` and across
    /// every check-then-publish of a finished task, so a task can never
    /// observe itself as latest and then publish after being superseded
    signal: std::sync::Mutex<()>,
    is_loading_tx: watch::Sender<bool>,
    last_error_tx: watch::Sender<Option<Error>>,
}

impl SyncCoordinator {
    /// Create a coordinator over a remote source and a catalog store
    pub fn new(remote: Arc<dyn RemoteSource>, store: Arc<dyn CatalogStore>) -> Self {
        let (is_loading_tx, _) = watch::channel(false);
        let (last_error_tx, _) = watch::channel(None);

        Self {
            inner: Arc::new(Inner {
                remote,
                store,
                generation: AtomicU64::new(0),
                commit: Mutex::new(()),
                signal: std::sync::Mutex::new(()),
                is_loading_tx,
                last_error_tx,
            }),
            in_flight: std::sync::Mutex::new(None),
        }
    }

    /// Start a background refresh, superseding any refresh in flight
    ///
    /// Fire-and-forget: the outcome is published through the catalog
    /// store and the `is_loading`/`last_error` signals.
    pub fn request_refresh(&self) {
        // Bump and flip loading under the signal lock: a finished task
        // checking its generation either sees the old one and publishes
        // before this point, or sees the new one and stays silent
        let generation = {
            let _guard = self.inner.signal.lock().expect("signal lock poisoned");
            let g = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            self.inner.is_loading_tx.send_replace(true);
            g
        };

        // Best-effort cancellation of the superseded fetch; the
        // generation check catches anything that slips through
        if let Some(prev) = self
            .in_flight
            .lock()
            .expect("in-flight lock poisoned")
            .take()
        {
            prev.abort();
        }

        debug!(generation, "starting catalog refresh");
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move { inner.run_refresh(generation).await });

        *self.in_flight.lock().expect("in-flight lock poisoned") = Some(handle);
    }

    /// Observe the loading state
    pub fn is_loading(&self) -> watch::Receiver<bool> {
        self.inner.is_loading_tx.subscribe()
    }

    /// Observe the most recent refresh error
    pub fn last_error(&self) -> watch::Receiver<Option<Error>> {
        self.inner.last_error_tx.subscribe()
    }
}

impl Inner {
    fn is_superseded(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }

    async fn run_refresh(&self, generation: u64) {
        let fetched = self.remote.fetch_all().await;

        if self.is_superseded(generation) {
            debug!(generation, "refresh superseded, discarding result");
            return;
        }

        match fetched {
            Ok(raw) => {
                let count = raw.len();
                let recipes = ingest(raw);

                // Only the latest generation may write, and writes are
                // serialized so they land in generation order
                let _commit = self.commit.lock().await;
                if self.is_superseded(generation) {
                    debug!(generation, "refresh superseded before commit, discarding");
                    return;
                }

                match self.store.overwrite(recipes, Utc::now()).await {
                    Ok(()) => {
                        info!(generation, count, "catalog refreshed");
                        self.publish_outcome(generation, None);
                    }
                    Err(e) => {
                        warn!(generation, error = %e, "catalog overwrite failed");
                        self.publish_outcome(generation, Some(e));
                    }
                }
            }
            Err(e) => {
                warn!(generation, error = %e, "catalog fetch failed");
                self.publish_outcome(generation, Some(e));
            }
        }
    }

    /// Publish a finished refresh's outcome, unless it was superseded
    ///
    /// The signal lock makes the supersession check and the publication
    /// atomic with respect to `request_refresh`: a stale outcome is
    /// dropped without touching either signal.
    fn publish_outcome(&self, generation: u64, error: Option<Error>) {
        let _guard = self.signal.lock().expect("signal lock poisoned");
        if self.is_superseded(generation) {
            debug!(generation, "refresh superseded, discarding outcome");
            return;
        }
        self.last_error_tx.send_replace(error);
        self.is_loading_tx.send_replace(false);
    }
}

/// Turn a fetched batch of raw recipes into stored recipes
///
/// Scores the whole batch, zips each recipe's steps with its timers and
/// assigns ids. Stored recipes only ever come from here, during an
/// overwrite.
pub(crate) fn ingest(raw: Vec<RawRecipe>) -> Vec<StoredRecipe> {
    let scores = difficulty_scores(&raw);
    let mut seen: HashMap<String, u32> = HashMap::new();

    raw.into_iter()
        .zip(scores)
        .map(|(recipe, score)| {
            if recipe.steps.len() != recipe.timers.len() {
                warn!(
                    title = %recipe.name,
                    steps = recipe.steps.len(),
                    timers = recipe.timers.len(),
                    "step/timer count mismatch, truncating to the shorter list"
                );
            }

            let steps = recipe
                .steps
                .into_iter()
                .zip(recipe.timers)
                .map(|(instruction, timer_minutes)| RecipeStep {
                    instruction,
                    timer_minutes,
                })
                .collect();

            let id = assign_id(&mut seen, &recipe.name);

            StoredRecipe {
                id,
                title: recipe.name,
                image_url: recipe.image_url,
                original_url: recipe.original_url,
                ingredients: recipe.ingredients,
                steps,
                difficulty_score: score,
            }
        })
        .collect()
}

/// Slug of the title, deduplicated with an ordinal suffix within a batch
fn assign_id(seen: &mut HashMap<String, u32>, title: &str) -> String {
    let base = slug(title);
    let n = seen.entry(base.clone()).or_insert(0);
    *n += 1;
    if *n == 1 {
        base
    } else {
        format!("{}-{}", base, n)
    }
}

fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        if c.is_alphanumeric() {
            out.push(c);
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    let trimmed = out.trim_end_matches('-');
    if trimmed.is_empty() {
        "recipe".to_string()
    } else {
        trimmed.to_string()
    }
}
