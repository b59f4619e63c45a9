//! In-memory storage backend.
//!
//! Each collection is a `HashMap` keyed by record id behind an
//! `Arc<RwLock<_>>`. Nothing is persisted.

mod repository;

pub use repository::InMemoryRepository;
