//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use trialdesk_core::records::Entity;
use trialdesk_core::storage::{select_matching, ListFilter, Repository, RepositoryError, Result};

/// One collection held in process memory.
///
/// Clones share the same underlying map.
#[derive(Debug)]
pub struct InMemoryRepository<T: Entity> {
    items: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Entity> Clone for InMemoryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> InMemoryRepository<T> {
    /// Creates a new empty collection.
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    async fn find_all(&self, filter: &ListFilter) -> Result<Vec<T>> {
        let items = self.items.read().await;
        Ok(select_matching(items.values().cloned(), filter))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<T> {
        let items = self.items.read().await;
        items
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(T::ENTITY_TYPE, id))
    }

    async fn create(&self, input: T::Create) -> Result<T> {
        let item = T::from_create(Uuid::new_v4(), input, Utc::now());

        let mut items = self.items.write().await;
        if items.contains_key(&item.id()) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: T::ENTITY_TYPE,
                id: item.id().to_string(),
            });
        }
        items.insert(item.id(), item.clone());
        Ok(item)
    }

    async fn update(&self, id: Uuid, patch: T::Patch) -> Result<T> {
        let mut items = self.items.write().await;
        let item = items
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found(T::ENTITY_TYPE, id))?;
        item.apply_patch(patch, Utc::now());
        Ok(item.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut items = self.items.write().await;
        if items.remove(&id).is_none() {
            return Err(RepositoryError::not_found(T::ENTITY_TYPE, id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trialdesk_core::records::{
        NewTrial, NewUser, Trial, TrialPatch, TrialPhase, TrialStatus, User, UserRole,
    };
    use trialdesk_core::storage::PageRequest;

    fn new_trial(title: &str) -> NewTrial {
        NewTrial::new(title, "PROTO-1", TrialPhase::Phase2, "Acme")
    }

    #[tokio::test]
    async fn test_create_and_find_by_id() {
        let repo = InMemoryRepository::<Trial>::new();

        let created = repo.create(new_trial("Trial A")).await.unwrap();
        let found = repo.find_by_id(created.id).await.unwrap();

        assert_eq!(found, created);
        assert_eq!(found.title, "Trial A");
    }

    #[tokio::test]
    async fn test_find_by_id_nonexistent() {
        let repo = InMemoryRepository::<Trial>::new();
        let result = repo.find_by_id(Uuid::new_v4()).await;
        assert!(matches!(
            result,
            Err(RepositoryError::NotFound {
                entity_type: "Trial",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_update_bumps_updated_at_only() {
        let repo = InMemoryRepository::<Trial>::new();
        let created = repo.create(new_trial("Trial A")).await.unwrap();

        let updated = repo
            .update(
                created.id,
                TrialPatch {
                    status: Some(TrialStatus::Recruiting),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, TrialStatus::Recruiting);
        assert_eq!(updated.title, "Trial A");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(repo.find_by_id(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_nonexistent() {
        let repo = InMemoryRepository::<Trial>::new();
        let result = repo.update(Uuid::new_v4(), TrialPatch::default()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_then_find_is_not_found() {
        let repo = InMemoryRepository::<Trial>::new();
        let created = repo.create(new_trial("Trial A")).await.unwrap();

        repo.delete(created.id).await.unwrap();

        let result = repo.find_by_id(created.id).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_nonexistent_leaves_collection_unchanged() {
        let repo = InMemoryRepository::<Trial>::new();
        repo.create(new_trial("Trial A")).await.unwrap();

        let result = repo.delete(Uuid::new_v4()).await;

        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
        assert_eq!(repo.find_all(&ListFilter::new()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_all_filters() {
        let repo = InMemoryRepository::<User>::new();
        repo.create(NewUser::new("Ana", "ana@site.org", UserRole::Monitor))
            .await
            .unwrap();
        repo.create(NewUser::new("Bo", "bo@site.org", UserRole::Admin))
            .await
            .unwrap();

        let monitors = repo
            .find_all(&ListFilter::new().with("role", "monitor"))
            .await
            .unwrap();

        assert_eq!(monitors.len(), 1);
        assert_eq!(monitors[0].name, "Ana");
    }

    #[tokio::test]
    async fn test_find_page() {
        let repo = InMemoryRepository::<Trial>::new();
        for i in 0..5 {
            repo.create(new_trial(&format!("Trial {i}"))).await.unwrap();
        }

        let page = repo
            .find_page(&ListFilter::new(), PageRequest::new(2, 2).unwrap())
            .await
            .unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.page, 2);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let repo = InMemoryRepository::<Trial>::new();
        let clone = repo.clone();

        let created = repo.create(new_trial("Shared")).await.unwrap();

        assert_eq!(clone.find_by_id(created.id).await.unwrap(), created);
    }
}
