//! Catalog freshness gate
//!
//! Decides whether the locally cached catalog is stale enough to warrant
//! a background refresh. The TTL is fixed at construction time.

use chrono::{DateTime, Duration, Utc};

/// Default cache validity window: one hour
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// TTL-based staleness check
#[derive(Debug, Clone, Copy)]
pub struct FreshnessGate {
    ttl: Duration,
}

impl FreshnessGate {
    /// Create a gate with a TTL in seconds
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// Whether the catalog is stale and should be refreshed
    ///
    /// `last_updated == None` is the never-updated sentinel and is always
    /// stale regardless of TTL. Otherwise stale means strictly older than
    /// the TTL: a catalog at exactly the boundary is still fresh.
    pub fn is_stale(&self, last_updated: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match last_updated {
            None => true,
            Some(updated) => now.signed_duration_since(updated) > self.ttl,
        }
    }
}

impl Default for FreshnessGate {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_SECS)
    }
}
