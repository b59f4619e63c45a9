//! Cache-aside decorator over any repository.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use trialdesk_core::cache::{
    collection_pattern, deserialize, entity_key, list_key, serialize, Cache,
};
use trialdesk_core::records::Entity;
use trialdesk_core::storage::{ListFilter, Repository, Result};

/// Cached repository decorator.
///
/// - **Reads**: check the cache first; on a miss read through and populate it.
/// - **Writes**: persist to the repository, then drop every cached key of the
///   collection.
///
/// Cache failures never fail the call. A failed read is a miss, a failed write
/// or invalidation is logged.
///
/// Every successful write bumps a generation counter. A read-through only
/// stores what it loaded if no write happened since it started, so a slow
/// read cannot put back data that a concurrent write just invalidated. The
/// counter is per process; instances sharing a Redis cache rely on the TTL.
pub struct CachedRepository<T, R, C>
where
    T: Entity,
    R: Repository<T> + ?Sized,
    C: Cache + ?Sized,
{
    repository: Arc<R>,
    cache: Arc<C>,
    ttl: Option<Duration>,
    generation: AtomicU64,
    _entity: PhantomData<fn() -> T>,
}

impl<T, R, C> CachedRepository<T, R, C>
where
    T: Entity,
    R: Repository<T> + ?Sized,
    C: Cache + ?Sized,
{
    /// Wraps `repository`. `ttl` of `None` keeps entries until invalidated or
    /// evicted.
    pub fn new(repository: Arc<R>, cache: Arc<C>, ttl: Option<Duration>) -> Self {
        Self {
            repository,
            cache,
            ttl,
            generation: AtomicU64::new(0),
            _entity: PhantomData,
        }
    }

    async fn read_cached<V: serde::de::DeserializeOwned>(&self, key: &str) -> Option<V> {
        match self.cache.get(key).await {
            Ok(Some(bytes)) => match deserialize(&bytes) {
                Ok(value) => {
                    tracing::trace!(key, "Cache hit");
                    Some(value)
                }
                Err(err) => {
                    tracing::warn!(key, error = %err, "Cached value could not be decoded");
                    None
                }
            },
            Ok(None) => {
                tracing::trace!(key, "Cache miss");
                None
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "Cache read failed");
                None
            }
        }
    }

    async fn write_cached<V: serde::Serialize + ?Sized>(&self, key: &str, value: &V) {
        let bytes = match serialize(value) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(key, error = %err, "Value could not be encoded for cache");
                return;
            }
        };
        if let Err(err) = self.cache.set(key, &bytes, self.ttl).await {
            tracing::warn!(key, error = %err, "Failed to populate cache");
        }
    }

    /// Populates `key` with a value loaded at `generation`, unless a write has
    /// happened since.
    async fn fill<V: serde::Serialize + ?Sized>(&self, key: &str, value: &V, generation: u64) {
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::trace!(key, "Skipping cache fill after concurrent write");
            return;
        }
        self.write_cached(key, value).await;

        // A write that finished its invalidation while the entry was being
        // stored would not have seen it.
        if self.generation.load(Ordering::SeqCst) != generation {
            if let Err(err) = self.cache.delete(key).await {
                tracing::warn!(key, error = %err, "Failed to drop racing cache fill");
            }
        }
    }

    /// Marks the collection as changed, then drops its cached keys.
    async fn invalidate_collection(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let pattern = collection_pattern(T::COLLECTION);
        if let Err(err) = self.cache.delete_pattern(&pattern).await {
            tracing::warn!(
                collection = T::COLLECTION,
                error = %err,
                "Failed to invalidate collection cache"
            );
        }
    }
}

#[async_trait]
impl<T, R, C> Repository<T> for CachedRepository<T, R, C>
where
    T: Entity,
    R: Repository<T> + ?Sized + 'static,
    C: Cache + ?Sized + 'static,
{
    async fn find_all(&self, filter: &ListFilter) -> Result<Vec<T>> {
        let key = list_key(T::COLLECTION, filter);
        if let Some(items) = self.read_cached::<Vec<T>>(&key).await {
            return Ok(items);
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let items = self.repository.find_all(filter).await?;
        self.fill(&key, &items, generation).await;
        Ok(items)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<T> {
        let key = entity_key(T::COLLECTION, id);
        if let Some(item) = self.read_cached::<T>(&key).await {
            return Ok(item);
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let item = self.repository.find_by_id(id).await?;
        self.fill(&key, &item, generation).await;
        Ok(item)
    }

    async fn create(&self, input: T::Create) -> Result<T> {
        let item = self.repository.create(input).await?;
        self.invalidate_collection().await;

        tracing::debug!(collection = T::COLLECTION, id = %item.id(), "Created record");
        Ok(item)
    }

    async fn update(&self, id: Uuid, patch: T::Patch) -> Result<T> {
        let item = self.repository.update(id, patch).await?;
        self.invalidate_collection().await;

        tracing::debug!(collection = T::COLLECTION, id = %id, "Updated record");
        Ok(item)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.repository.delete(id).await?;
        self.invalidate_collection().await;

        tracing::debug!(collection = T::COLLECTION, id = %id, "Deleted record");
        Ok(())
    }
}
