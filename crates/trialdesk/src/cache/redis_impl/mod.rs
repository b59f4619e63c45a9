//! Redis cache backend for deployments that share a cache across instances.

mod cache;
mod error;

pub use cache::RedisCache;
