use dashmap::DashMap;
use serde::{Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};
use std::future::Future;
use std::time::{Duration, Instant};

use crate::config::CacheConfig;

/// Short-lived cache for schema, statistics and tool listings.
///
/// Domain modules never touch it; pages consult it to skip redundant refetches.
pub struct ResultsCache {
    entries: DashMap<String, CachedValue>,
    ttl: Duration,
    max_entries: usize,
    enabled: bool,
}

struct CachedValue {
    value: serde_json::Value,
    stored_at: Instant,
}

impl ResultsCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_entries,
            enabled: max_entries > 0,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        let mut cache = Self::new(Duration::from_secs(config.ttl_secs), config.max_entries);
        cache.enabled = config.enabled && config.max_entries > 0;
        cache
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.enabled {
            return None;
        }
        let hashed = self.hash_key(key);

        {
            let entry = self.entries.get(&hashed)?;
            if entry.stored_at.elapsed() < self.ttl {
                return serde_json::from_value(entry.value.clone()).ok();
            }
        }
        // Guard dropped above; removing while holding it would deadlock the shard.
        self.entries.remove(&hashed);
        None
    }

    pub fn insert<T: Serialize>(&self, key: &str, value: &T) {
        if !self.enabled {
            return;
        }
        let Ok(value) = serde_json::to_value(value) else {
            return;
        };

        if self.entries.len() >= self.max_entries {
            self.evict();
        }
        self.entries.insert(
            self.hash_key(key),
            CachedValue {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Return the cached value or run `fetch` and remember its success.
    pub async fn get_or_fetch<T, E, F, Fut>(&self, key: &str, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get(key) {
            tracing::debug!(key, "results cache hit");
            return Ok(hit);
        }
        let value = fetch().await?;
        self.insert(key, &value);
        Ok(value)
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.remove(&self.hash_key(key));
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // Drop expired entries first; if still full, clear 25%.
    fn evict(&self) {
        self.entries.retain(|_, v| v.stored_at.elapsed() < self.ttl);
        if self.entries.len() < self.max_entries {
            return;
        }
        let to_remove: Vec<_> = self
            .entries
            .iter()
            .take((self.max_entries / 4).max(1))
            .map(|r| r.key().clone())
            .collect();
        for key in to_remove {
            self.entries.remove(&key);
        }
    }

    fn hash_key(&self, key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let cache = ResultsCache::new(Duration::from_secs(60), 8);
        cache.insert("schema", &"Node properties".to_string());
        assert_eq!(cache.get::<String>("schema").as_deref(), Some("Node properties"));
        assert!(cache.get::<String>("stats").is_none());
    }

    #[test]
    fn test_expired_entries_are_dropped() {
        let cache = ResultsCache::new(Duration::ZERO, 8);
        cache.insert("schema", &1u32);
        assert!(cache.get::<u32>("schema").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_eviction_keeps_cap() {
        let cache = ResultsCache::new(Duration::from_secs(60), 4);
        for i in 0..10 {
            cache.insert(&format!("key-{i}"), &i);
        }
        assert!(cache.len() <= 4);
        assert_eq!(cache.get::<i32>("key-9"), Some(9));
    }

    #[test]
    fn test_disabled_cache() {
        let cache = ResultsCache::from_config(&CacheConfig {
            enabled: false,
            ttl_secs: 60,
            max_entries: 8,
        });
        cache.insert("schema", &1u32);
        assert!(cache.get::<u32>("schema").is_none());
    }

    #[tokio::test]
    async fn test_get_or_fetch_only_fetches_once() {
        let cache = ResultsCache::new(Duration::from_secs(60), 8);
        let mut calls = 0;

        for _ in 0..3 {
            let value: Result<u32, ()> = cache
                .get_or_fetch("stats", || {
                    calls += 1;
                    async { Ok(42) }
                })
                .await;
            assert_eq!(value, Ok(42));
        }
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let cache = ResultsCache::new(Duration::from_secs(60), 8);
        let first: Result<u32, &str> = cache.get_or_fetch("stats", || async { Err("down") }).await;
        assert!(first.is_err());
        assert!(cache.is_empty());
    }
}
