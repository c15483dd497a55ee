// # Remote Source Trait
//
// Defines the interface for fetching the full recipe catalog from the
// network.
//
// ## Implementations
//
// - HTTP: `recipes-remote-http` crate (reqwest)
//
// The refresh model is full-catalog replacement: one fetch yields the
// whole list of raw recipes or fails. There is no server-side delta
// sync and no pagination.

use async_trait::async_trait;

use crate::model::RawRecipe;

/// Trait for remote catalog sources
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Cancellation
///
/// `fetch_all` must be cancelable on a best-effort basis: dropping the
/// future (or aborting the task driving it) should abort the underlying
/// request where the transport supports it. The coordinator additionally
/// discards results of superseded fetches, so implementations need not
/// guarantee hard cancellation.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetch the full recipe catalog
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<RawRecipe>)`: the complete remote catalog
    /// - `Err(Error::NetworkFetchFailed)`: the fetch failed or timed out
    async fn fetch_all(&self) -> Result<Vec<RawRecipe>, crate::Error>;
}
