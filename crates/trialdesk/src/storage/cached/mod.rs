//! Cache-policy wrapper.
//!
//! A [`CachePolicy`] is resolved once into a [`PolicyLayer`] when the
//! application state is built. `Passthrough` hands repositories back
//! untouched; `Cached` wraps each one in a [`CachedRepository`] sharing one
//! cache backend.
//!
//! ```ignore
//! let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new(10_000));
//! let layer = PolicyLayer::Cached { cache, ttl: None };
//!
//! let trials = layer.wrap(Arc::new(InMemoryRepository::<Trial>::new()));
//! ```

mod repository;

use std::sync::Arc;
use std::time::Duration;

use trialdesk_core::cache::{Cache, CachePolicy};
use trialdesk_core::records::Entity;
use trialdesk_core::storage::Repository;

pub use repository::CachedRepository;

/// A cache policy bound to the resources it needs.
#[derive(Clone)]
pub enum PolicyLayer {
    Passthrough,
    Cached {
        cache: Arc<dyn Cache>,
        ttl: Option<Duration>,
    },
}

impl PolicyLayer {
    pub fn policy(&self) -> CachePolicy {
        match self {
            PolicyLayer::Passthrough => CachePolicy::Passthrough,
            PolicyLayer::Cached { .. } => CachePolicy::Cached,
        }
    }

    /// Wraps `repository` according to the policy.
    pub fn wrap<T, R>(&self, repository: Arc<R>) -> Arc<dyn Repository<T>>
    where
        T: Entity,
        R: Repository<T> + 'static,
    {
        match self {
            PolicyLayer::Passthrough => repository,
            PolicyLayer::Cached { cache, ttl } => Arc::new(CachedRepository::new(
                repository,
                Arc::clone(cache),
                *ttl,
            )),
        }
    }
}
