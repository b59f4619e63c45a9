//! Application state with repository-based storage.
//!
//! One repository trait object per collection, each already wrapped by the
//! configured cache policy. The storage backend behind them is chosen by
//! feature flag.

use std::sync::Arc;

use trialdesk_core::cache::CachePolicy;
use trialdesk_core::records::{
    AdverseEvent, AuditLog, Document, Patient, RegulatoryApproval, Site, Trial, User,
};
use trialdesk_core::storage::Repository;

use crate::config::Config;
use crate::storage::PolicyLayer;

/// Shared application state.
///
/// Cloned into each resource router; clones share the same repositories.
#[derive(Clone)]
pub struct AppState {
    pub trials: Arc<dyn Repository<Trial>>,
    pub sites: Arc<dyn Repository<Site>>,
    pub patients: Arc<dyn Repository<Patient>>,
    pub documents: Arc<dyn Repository<Document>>,
    pub adverse_events: Arc<dyn Repository<AdverseEvent>>,
    pub regulatory_approvals: Arc<dyn Repository<RegulatoryApproval>>,
    pub audit_logs: Arc<dyn Repository<AuditLog>>,
    pub users: Arc<dyn Repository<User>>,
    /// Policy the repositories were built with.
    pub cache_policy: CachePolicy,
}

/// Resolves the configured cache policy, connecting to the cache backend only
/// when it is needed.
async fn policy_layer(config: &Config) -> anyhow::Result<PolicyLayer> {
    match config.cache_policy {
        CachePolicy::Passthrough => Ok(PolicyLayer::Passthrough),
        CachePolicy::Cached => Ok(PolicyLayer::Cached {
            cache: crate::cache::connect(config).await?,
            ttl: config.cache_ttl(),
        }),
    }
}

#[cfg(any(feature = "inmemory", test))]
mod inmemory_backend {
    use super::*;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Builds state over fresh in-memory collections.
        pub fn in_memory(layer: &PolicyLayer) -> Self {
            Self {
                trials: layer.wrap(Arc::new(InMemoryRepository::<Trial>::new())),
                sites: layer.wrap(Arc::new(InMemoryRepository::<Site>::new())),
                patients: layer.wrap(Arc::new(InMemoryRepository::<Patient>::new())),
                documents: layer.wrap(Arc::new(InMemoryRepository::<Document>::new())),
                adverse_events: layer.wrap(Arc::new(InMemoryRepository::<AdverseEvent>::new())),
                regulatory_approvals: layer
                    .wrap(Arc::new(InMemoryRepository::<RegulatoryApproval>::new())),
                audit_logs: layer.wrap(Arc::new(InMemoryRepository::<AuditLog>::new())),
                users: layer.wrap(Arc::new(InMemoryRepository::<User>::new())),
                cache_policy: layer.policy(),
            }
        }
    }
}

#[cfg(feature = "inmemory")]
impl AppState {
    /// Creates AppState with in-memory storage.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let layer = policy_layer(config).await?;
        tracing::info!(cache_policy = %layer.policy(), "Using in-memory storage");
        Ok(Self::in_memory(&layer))
    }
}

#[cfg(feature = "sqlite")]
impl AppState {
    /// Creates AppState with SQLite storage, one table per collection.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        use crate::storage::SqliteStore;

        let layer = policy_layer(config).await?;
        let store = SqliteStore::open(&config.sqlite_path).await?;
        tracing::info!(
            cache_policy = %layer.policy(),
            path = %config.sqlite_path,
            "Using SQLite storage"
        );

        Ok(Self {
            trials: layer.wrap(Arc::new(store.repository::<Trial>().await?)),
            sites: layer.wrap(Arc::new(store.repository::<Site>().await?)),
            patients: layer.wrap(Arc::new(store.repository::<Patient>().await?)),
            documents: layer.wrap(Arc::new(store.repository::<Document>().await?)),
            adverse_events: layer.wrap(Arc::new(store.repository::<AdverseEvent>().await?)),
            regulatory_approvals: layer
                .wrap(Arc::new(store.repository::<RegulatoryApproval>().await?)),
            audit_logs: layer.wrap(Arc::new(store.repository::<AuditLog>().await?)),
            users: layer.wrap(Arc::new(store.repository::<User>().await?)),
            cache_policy: layer.policy(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trialdesk_core::records::{NewUser, UserRole};
    use trialdesk_core::storage::ListFilter;

    #[tokio::test]
    async fn test_clones_share_repositories() {
        let state = AppState::in_memory(&PolicyLayer::Passthrough);
        let clone = state.clone();

        state
            .users
            .create(NewUser::new("Ana", "ana@site.org", UserRole::Admin))
            .await
            .unwrap();

        assert_eq!(clone.users.find_all(&ListFilter::new()).await.unwrap().len(), 1);
        assert!(clone.trials.find_all(&ListFilter::new()).await.unwrap().is_empty());
        assert_eq!(clone.cache_policy, CachePolicy::Passthrough);
    }
}
