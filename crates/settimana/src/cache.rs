//! Write-once store of fetched agenda payloads, keyed by week window.

use lru::LruCache;
use serde_json::Value;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::date_window::CacheKey;

/// Decoded response body for one week window.
pub type Payload = Arc<Value>;

/// Cache handle shared by the primary fetch and its prefetch tasks.
pub type SharedCache = Arc<Mutex<AgendaCache>>;

/// Agenda payloads by [`CacheKey`].
///
/// Unbounded by default, matching a single browsing session. A bounded cache
/// evicts the least recently used week once full.
pub struct AgendaCache {
    entries: LruCache<CacheKey, Payload>,
}

impl AgendaCache {
    /// A cache that never evicts.
    pub fn unbounded() -> Self {
        Self {
            entries: LruCache::unbounded(),
        }
    }

    /// A cache holding at most `capacity` weeks. Zero means unbounded.
    pub fn bounded(capacity: usize) -> Self {
        match NonZeroUsize::new(capacity) {
            Some(cap) => Self {
                entries: LruCache::new(cap),
            },
            None => Self::unbounded(),
        }
    }

    pub fn shared(self) -> SharedCache {
        Arc::new(Mutex::new(self))
    }

    /// Look up a week, marking it as recently used.
    pub fn get(&mut self, key: &CacheKey) -> Option<Payload> {
        self.entries.get(key).cloned()
    }

    /// Insert or overwrite a week.
    pub fn put(&mut self, key: CacheKey, payload: Payload) {
        let inserted = key.clone();
        if let Some((evicted, _)) = self.entries.push(key, payload) {
            if evicted != inserted {
                debug!(key = %evicted, "evicted least recently used agenda week");
            }
        }
    }

    /// Drop a week, returning its payload if it was cached.
    pub fn remove(&mut self, key: &CacheKey) -> Option<Payload> {
        self.entries.pop(key)
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AgendaCache {
    fn default() -> Self {
        Self::unbounded()
    }
}
