//! Error types for the recipe cache
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for recipe cache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the recipe cache
///
/// All variants carry `String` payloads so the type stays `Clone`, which
/// the `last_error` watch signal requires.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The catalog store cannot be opened or accessed
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// An overwrite failed; the prior catalog is left untouched
    #[error("storage write failed: {0}")]
    StorageWriteFailed(String),

    /// Point lookup miss
    #[error("recipe not found: {0}")]
    RecipeNotFound(String),

    /// The remote source failed or timed out
    #[error("network fetch failed: {0}")]
    NetworkFetchFailed(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a storage-unavailable error
    pub fn storage_unavailable(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }

    /// Create a storage-write error
    pub fn storage_write(msg: impl Into<String>) -> Self {
        Self::StorageWriteFailed(msg.into())
    }

    /// Create a "recipe not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::RecipeNotFound(msg.into())
    }

    /// Create a network fetch error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::NetworkFetchFailed(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
