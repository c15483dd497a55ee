// # HTTP Remote Source
//
// This crate provides the HTTP-based remote catalog source for the
// recipe cache.
//
// ## Architecture
//
// The remote catalog is a single JSON document containing the full
// recipe list; one GET fetches everything (full-catalog-replacement
// model, no pagination or delta sync). Cancellation is best-effort:
// dropping the future aborts the in-flight request.
//
// Transport-level retries are out of scope here; the sync coordinator
// surfaces failures and the caller decides whether to refresh again.

use std::time::Duration;

use recipes_core::config::RemoteConfig;
use recipes_core::model::RawRecipe;
use recipes_core::traits::RemoteSource;
use recipes_core::{Error, Result};
use tracing::debug;

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP-based remote catalog source
pub struct HttpRemoteSource {
    /// URL of the full-catalog JSON document
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpRemoteSource {
    /// Create a new HTTP remote source with the default timeout
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create with a custom request timeout
    ///
    /// Fails if the HTTP client cannot be constructed; a client without
    /// the configured timeout is worse than no client.
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Create from a validated remote configuration
    pub fn from_config(config: &RemoteConfig) -> Result<Self> {
        config.validate()?;
        match config {
            RemoteConfig::Http { url, timeout_secs } => {
                Self::with_timeout(url.clone(), Duration::from_secs(*timeout_secs))
            }
        }
    }
}

#[async_trait::async_trait]
impl RemoteSource for HttpRemoteSource {
    async fn fetch_all(&self) -> Result<Vec<RawRecipe>> {
        debug!(url = %self.url, "fetching remote catalog");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::network(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::network(format!("HTTP error: {}", response.status())));
        }

        let recipes: Vec<RawRecipe> = response
            .json()
            .await
            .map_err(|e| Error::network(format!("failed to decode catalog: {}", e)))?;

        debug!(count = recipes.len(), "remote catalog fetched");
        Ok(recipes)
    }
}
