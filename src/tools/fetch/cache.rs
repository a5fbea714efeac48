//! TTL+LRU cache for rendered HTML.
//!
//! Keyed by the fully-qualified render request URL. Entries expire after
//! the configured TTL; at capacity the single least-recently-accessed entry
//! is evicted with an O(n) scan, which is fine at the small capacities this
//! cache runs at. The mutex is never held across an await point.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct CacheEntry {
    html: String,
    expires_at: Instant,
    last_access: Instant,
}

pub struct RenderCache {
    inner: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    capacity: usize,
}

impl RenderCache {
    pub fn new(ttl_ms: u64, capacity: usize) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            ttl: Duration::from_millis(ttl_ms),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.get_at(key, Instant::now())
    }

    pub fn insert(&self, key: &str, html: String) {
        self.insert_at(key, html, Instant::now());
    }

    /// Lookup with an explicit clock, so TTL boundaries are testable.
    pub(crate) fn get_at(&self, key: &str, now: Instant) -> Option<String> {
        let mut map = self.inner.lock().expect("cache mutex poisoned");
        match map.get_mut(key) {
            Some(entry) if now < entry.expires_at => {
                entry.last_access = now;
                Some(entry.html.clone())
            }
            Some(_) => {
                map.remove(key);
                None
            }
            None => None,
        }
    }

    pub(crate) fn insert_at(&self, key: &str, html: String, now: Instant) {
        let mut map = self.inner.lock().expect("cache mutex poisoned");

        // Expired entries go first; they cost nothing to keep out.
        map.retain(|_, entry| now < entry.expires_at);

        if map.len() >= self.capacity && !map.contains_key(key) {
            let lru_key = map
                .iter()
                .min_by_key(|(_, entry)| entry.last_access)
                .map(|(k, _)| k.clone());
            if let Some(lru_key) = lru_key {
                map.remove(&lru_key);
            }
        }

        map.insert(
            key.to_string(),
            CacheEntry {
                html,
                expires_at: now + self.ttl,
                last_access: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("cache mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
