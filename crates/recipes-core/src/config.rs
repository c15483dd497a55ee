//! Configuration types for the recipe cache
//!
//! This module defines all configuration structures used throughout the
//! crate. The TTL and the store/remote selection are fixed at
//! construction; nothing here is tunable at runtime.

use serde::{Deserialize, Serialize};

use crate::freshness::DEFAULT_TTL_SECS;

/// Main cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds of cache validity (time to live)
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Remote source configuration
    pub remote: RemoteConfig,

    /// Catalog store configuration
    #[serde(default)]
    pub store: StoreConfig,
}

impl CacheConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.remote.validate()?;
        self.store.validate()?;
        Ok(())
    }
}

/// Remote source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RemoteConfig {
    /// HTTP catalog endpoint returning the full recipe list as JSON
    Http {
        /// URL of the catalog document
        url: String,
        /// Request timeout in seconds
        #[serde(default = "default_remote_timeout_secs")]
        timeout_secs: u64,
    },
}

impl RemoteConfig {
    /// Validate the remote source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            RemoteConfig::Http { url, timeout_secs } => {
                if url.is_empty() {
                    return Err(crate::Error::config("remote URL cannot be empty"));
                }
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(crate::Error::config(format!(
                        "remote URL must use http or https, got: {}",
                        url
                    )));
                }
                if *timeout_secs == 0 {
                    return Err(crate::Error::config("remote timeout must be > 0"));
                }
                Ok(())
            }
        }
    }
}

/// Catalog store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// File-backed catalog store
    File {
        /// Path to the catalog file
        path: String,
    },

    /// In-memory catalog store (not persistent)
    #[default]
    Memory,
}

impl StoreConfig {
    /// Validate the store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            StoreConfig::File { path } if path.is_empty() => {
                Err(crate::Error::config("catalog file path cannot be empty"))
            }
            _ => Ok(()),
        }
    }
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}

fn default_remote_timeout_secs() -> u64 {
    10
}
