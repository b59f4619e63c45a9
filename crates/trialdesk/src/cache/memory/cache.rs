//! In-memory cache implementation with LRU eviction.
//!
//! Entries carry an optional expiry that is checked lazily on read.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use trialdesk_core::cache::{pattern_matches, Cache, Result};

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        Self { value, expires_at }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() > exp)
    }
}

/// Thread-safe LRU cache bounded by entry count.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
}

impl MemoryCache {
    /// Creates a cache holding at most `max_entries` values. A capacity of
    /// zero is raised to one.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// Number of stored entries, expired ones included.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        // `LruCache::get` promotes the key, so it needs the write lock.
        let mut store = self.store.write().await;

        let expired = match store.get(key) {
            Some(entry) if entry.is_expired() => true,
            Some(entry) => return Ok(Some(entry.value.clone())),
            None => return Ok(None),
        };

        if expired {
            store.pop(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut store = self.store.write().await;
        store.put(key.to_string(), CacheEntry::new(value.to_vec(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut store = self.store.write().await;
        store.pop(key);
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<()> {
        let mut store = self.store.write().await;
        let keys_to_delete: Vec<String> = store
            .iter()
            .filter(|(key, _)| pattern_matches(pattern, key))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &keys_to_delete {
            store.pop(key);
        }

        tracing::trace!(pattern, deleted = keys_to_delete.len(), "Deleted cache keys");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trialdesk_core::cache::{collection_pattern, entity_key, list_key};
    use trialdesk_core::storage::ListFilter;
    use uuid::Uuid;

    const TEST_MAX_ENTRIES: usize = 1000;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);

        cache.set("trials:1", b"value", None).await.unwrap();

        assert_eq!(
            cache.get("trials:1").await.unwrap(),
            Some(b"value".to_vec())
        );
        assert_eq!(cache.get("trials:2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);

        cache.set("sites:1", b"value", None).await.unwrap();
        cache.delete("sites:1").await.unwrap();

        assert!(cache.get("sites:1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);

        cache
            .set("users:1", b"short-lived", Some(Duration::from_millis(50)))
            .await
            .unwrap();
        assert!(cache.get("users:1").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(cache.get("users:1").await.unwrap().is_none());
        // Expired entries are dropped once observed.
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_delete_pattern_invalidates_one_collection() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        let id = Uuid::new_v4();

        cache.set(&entity_key("trials", id), b"t", None).await.unwrap();
        cache
            .set(&list_key("trials", &ListFilter::new()), b"[]", None)
            .await
            .unwrap();
        cache.set(&entity_key("sites", id), b"s", None).await.unwrap();

        cache
            .delete_pattern(&collection_pattern("trials"))
            .await
            .unwrap();

        assert!(cache.get(&entity_key("trials", id)).await.unwrap().is_none());
        assert!(cache
            .get(&list_key("trials", &ListFilter::new()))
            .await
            .unwrap()
            .is_none());
        assert!(cache.get(&entity_key("sites", id)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let cache = MemoryCache::new(2);

        cache.set("k:1", b"1", None).await.unwrap();
        cache.set("k:2", b"2", None).await.unwrap();
        // Touch k:1 so k:2 becomes least recently used.
        cache.get("k:1").await.unwrap();
        cache.set("k:3", b"3", None).await.unwrap();

        assert!(cache.get("k:1").await.unwrap().is_some());
        assert!(cache.get("k:2").await.unwrap().is_none());
        assert!(cache.get("k:3").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_zero_capacity_is_raised() {
        let cache = MemoryCache::new(0);
        cache.set("k", b"v", None).await.unwrap();
        assert!(cache.get("k").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_overwrite_value() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);

        cache.set("k", b"first", None).await.unwrap();
        cache.set("k", b"second", None).await.unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some(b"second".to_vec()));
    }
}
