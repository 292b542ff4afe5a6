//! Pluggable cache backend
//!
//! The cache memoizes content fetches, directory listings, and whole search
//! responses. Values are `serde_json::Value` so an external (networked)
//! backend can store them without knowing the pipeline's types. Keys are
//! prefixed per operation so the key spaces can never collide.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod memory;

pub use memory::InMemoryCache;

/// Cache hit/miss counters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheStats {
    /// Successful lookups.
    pub hits: u64,

    /// Lookups that found nothing (or an expired entry).
    pub misses: u64,

    /// Live entries at the time of the call.
    pub size: usize,
}

/// A key-value store with per-entry TTL.
///
/// The default implementation is [`InMemoryCache`]; any store providing
/// these three operations can be swapped in without touching the
/// orchestrator. Implementations must be safe under concurrent access: a
/// `set` is atomic with respect to readers.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Retrieve a value. Expired entries are treated as absent.
    async fn get(&self, key: &str) -> Option<serde_json::Value>;

    /// Store a value with a time-to-live.
    async fn set(&self, key: &str, value: serde_json::Value, ttl: Duration);

    /// Hit/miss counters for observability.
    async fn stats(&self) -> CacheStats;
}

/// Cache key constructors.
///
/// Deterministic, and collision-free across operation types via the
/// operation-name prefix.
pub mod keys {
    /// Key for a fetched skill document.
    #[must_use]
    pub fn skill_content(repo: &str, path: &str) -> String {
        format!("skill:{repo}:{path}")
    }

    /// Key for a directory listing.
    #[must_use]
    pub fn listing(repo: &str, path: &str) -> String {
        format!("listing:{repo}:{path}")
    }

    /// Key for a whole search response.
    #[must_use]
    pub fn search(query: &str, limit: usize, include_content: bool, include_references: bool) -> String {
        format!("search:{query}:{limit}:{include_content}:{include_references}")
    }

}
