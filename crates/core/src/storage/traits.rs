use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::records::Entity;

use super::{paginate, ListFilter, Page, PageRequest, Result};

/// CRUD access to one entity collection.
///
/// Implementations are thin pass-throughs to a backing store. They assign the
/// identifier and timestamps on `create`, bump `updated_at` on `update`, and
/// report a missing record as [`RepositoryError::NotFound`](super::RepositoryError::NotFound).
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// All records matching `filter`, ordered by `created_at` then id.
    async fn find_all(&self, filter: &ListFilter) -> Result<Vec<T>>;

    async fn find_by_id(&self, id: Uuid) -> Result<T>;

    async fn create(&self, input: T::Create) -> Result<T>;

    async fn update(&self, id: Uuid, patch: T::Patch) -> Result<T>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    /// One page of the filtered listing.
    async fn find_page(&self, filter: &ListFilter, request: PageRequest) -> Result<Page<T>> {
        let items = self.find_all(filter).await?;
        Ok(paginate(items, request))
    }
}

#[async_trait]
impl<T, R> Repository<T> for Arc<R>
where
    T: Entity,
    R: Repository<T> + ?Sized,
{
    async fn find_all(&self, filter: &ListFilter) -> Result<Vec<T>> {
        (**self).find_all(filter).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<T> {
        (**self).find_by_id(id).await
    }

    async fn create(&self, input: T::Create) -> Result<T> {
        (**self).create(input).await
    }

    async fn update(&self, id: Uuid, patch: T::Patch) -> Result<T> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        (**self).delete(id).await
    }

    async fn find_page(&self, filter: &ListFilter, request: PageRequest) -> Result<Page<T>> {
        (**self).find_page(filter, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{NewUser, User, UserPatch, UserRole};
    use crate::storage::{select_matching, RepositoryError};
    use chrono::{Duration, Utc};
    use std::sync::Mutex;

    /// Minimal vector-backed repository for exercising the provided methods.
    #[derive(Default)]
    struct VecRepository {
        users: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl Repository<User> for VecRepository {
        async fn find_all(&self, filter: &ListFilter) -> Result<Vec<User>> {
            let users = self.users.lock().unwrap().clone();
            Ok(select_matching(users, filter))
        }

        async fn find_by_id(&self, id: Uuid) -> Result<User> {
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == id)
                .cloned()
                .ok_or_else(|| RepositoryError::not_found("User", id))
        }

        async fn create(&self, input: NewUser) -> Result<User> {
            let mut users = self.users.lock().unwrap();
            let now = Utc::now() + Duration::seconds(users.len() as i64);
            let user = User::from_create(Uuid::new_v4(), input, now);
            users.push(user.clone());
            Ok(user)
        }

        async fn update(&self, _id: Uuid, _patch: UserPatch) -> Result<User> {
            unimplemented!()
        }

        async fn delete(&self, _id: Uuid) -> Result<()> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn test_default_find_page_through_arc() {
        let repo: Arc<dyn Repository<User>> = Arc::new(VecRepository::default());
        for i in 0..5 {
            let role = if i % 2 == 0 {
                UserRole::Monitor
            } else {
                UserRole::Viewer
            };
            repo.create(NewUser::new(format!("user{i}"), format!("u{i}@site.org"), role))
                .await
                .unwrap();
        }

        let filter = ListFilter::new().with("role", "monitor");
        let page = repo
            .find_page(&filter, PageRequest::new(2, 2).unwrap())
            .await
            .unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "user4");
    }

    #[tokio::test]
    async fn test_find_by_id_missing_is_not_found() {
        let repo = Arc::new(VecRepository::default());
        let err = repo.find_by_id(Uuid::new_v4()).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
