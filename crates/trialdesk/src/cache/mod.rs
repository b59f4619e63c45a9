//! Cache backend implementations.
//!
//! The backend is selected at compile time:
//!
//! - `memory` (default): in-process LRU cache
//! - `redis`: shared Redis cache
//!
//! The features are mutually exclusive.

use std::sync::Arc;

use trialdesk_core::cache::Cache;

use crate::config::Config;

#[cfg(all(feature = "memory", feature = "redis"))]
compile_error!(
    "Features 'memory' and 'redis' are mutually exclusive. \
    Enable only one cache backend at a time."
);

#[cfg(not(any(feature = "memory", feature = "redis")))]
compile_error!(
    "No cache backend selected. Enable 'memory' or 'redis' feature. \
    Example: cargo build -p trialdesk --features memory"
);

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "redis")]
pub mod redis_impl;

#[cfg(feature = "memory")]
pub use memory::MemoryCache;

#[cfg(feature = "redis")]
pub use redis_impl::RedisCache;

/// Opens the compiled-in cache backend.
#[cfg(feature = "memory")]
pub async fn connect(config: &Config) -> anyhow::Result<Arc<dyn Cache>> {
    tracing::info!(max_entries = config.cache_max_entries, "Using in-memory cache");
    Ok(Arc::new(MemoryCache::new(config.cache_max_entries)))
}

/// Opens the compiled-in cache backend.
#[cfg(feature = "redis")]
pub async fn connect(config: &Config) -> anyhow::Result<Arc<dyn Cache>> {
    tracing::info!(url = %config.redis_url, "Connecting to Redis cache");
    Ok(Arc::new(RedisCache::new(&config.redis_url).await?))
}
