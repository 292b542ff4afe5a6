//! In-memory cache backend

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::{CacheBackend, CacheStats};

struct Entry {
    value: serde_json::Value,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Process-local cache with lazy TTL expiration.
///
/// Expired entries are removed when a read encounters them; there is no
/// background sweep. Reads and writes are safe under concurrent access, and
/// a `set` replaces the previous value atomically.
#[derive(Default)]
pub struct InMemoryCache {
    store: RwLock<HashMap<String, Entry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl InMemoryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheBackend for InMemoryCache {
    async fn get(&self, key: &str) -> Option<serde_json::Value> {
        let now = Instant::now();

        {
            let store = self.store.read().await;
            match store.get(key) {
                Some(entry) if !entry.is_expired(now) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(entry.value.clone());
                }
                Some(_) => {} // expired, fall through to remove
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
            }
        }

        // Lazy expiration: re-check under the write lock since another
        // writer may have refreshed the entry in between.
        let mut store = self.store.write().await;
        if let Some(entry) = store.get(key) {
            if entry.is_expired(now) {
                store.remove(key);
            } else {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.value.clone());
            }
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    async fn set(&self, key: &str, value: serde_json::Value, ttl: Duration) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        let mut store = self.store.write().await;
        store.insert(key.to_string(), entry);
    }

    async fn stats(&self) -> CacheStats {
        let store = self.store.read().await;
        let now = Instant::now();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: store.values().filter(|e| !e.is_expired(now)).count(),
        }
    }
}
