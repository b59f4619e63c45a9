//! In-process cache backend for single-instance deployments.

mod cache;

pub use cache::MemoryCache;
