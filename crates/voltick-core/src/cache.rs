//! TTL cache for provider responses.
//!
//! Key to JSON value store with expiry by entry age. An expired entry is
//! treated as absent and removed on the read that finds it. A zero-hour
//! budget disables the cache entirely.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    stored_at: Instant,
}

#[derive(Debug)]
struct CacheInner {
    map: HashMap<String, CacheEntry>,
    ttl: Duration,
}

/// Thread-safe JSON cache handle; clones share the same store.
#[derive(Debug, Clone)]
pub struct CacheStore {
    inner: Arc<tokio::sync::RwLock<CacheInner>>,
}

impl CacheStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(tokio::sync::RwLock::new(CacheInner {
                map: HashMap::new(),
                ttl,
            })),
        }
    }

    /// Cache with the given expiry budget in hours.
    pub fn with_expiry_hours(hours: u64) -> Self {
        Self::new(Duration::from_secs(hours * 3600))
    }

    /// Disabled cache: reads always miss, writes are dropped.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Fetch a value, dropping it when its age exceeds the budget.
    pub async fn get(&self, key: &str) -> Option<Value> {
        let mut store = self.inner.write().await;
        match store.map.get(key) {
            Some(entry) if entry.stored_at.elapsed() <= store.ttl => Some(entry.value.clone()),
            Some(_) => {
                store.map.remove(key);
                None
            }
            None => None,
        }
    }

    pub async fn set(&self, key: impl Into<String>, value: Value) {
        let mut store = self.inner.write().await;
        if store.ttl.is_zero() {
            return;
        }
        store.map.insert(
            key.into(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
