//! Storage backend implementations.
//!
//! This module provides concrete implementations of the generic
//! `trialdesk_core::storage::Repository` trait. The backend is selected at
//! compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): one `HashMap` per collection, nothing persisted
//! - `sqlite`: one table per collection using `rusqlite` and `tokio-rusqlite`
//!
//! These features are mutually exclusive - only one storage backend can be
//! enabled at a time.
//!
//! Build with SQLite:
//! ```bash
//! cargo build -p trialdesk --no-default-features --features sqlite,memory
//! ```

#[cfg(all(feature = "inmemory", feature = "sqlite"))]
compile_error!(
    "Features 'inmemory' and 'sqlite' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "inmemory", feature = "sqlite")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'sqlite' feature. \
    Example: cargo build -p trialdesk --features sqlite"
);

pub mod cached;

// Tests build their state on the in-memory backend whatever the feature set.
#[cfg(any(feature = "inmemory", test))]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[allow(unused_imports)]
pub use cached::CachedRepository;
pub use cached::PolicyLayer;

#[cfg(any(feature = "inmemory", test))]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
#[allow(unused_imports)]
pub use sqlite::SqliteRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
