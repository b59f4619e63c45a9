//! Repository over the REST API.

use std::marker::PhantomData;

use async_trait::async_trait;
use uuid::Uuid;

use trialdesk_core::records::Entity;
use trialdesk_core::storage::{ListFilter, Page, PageRequest, Repository, Result};

use super::TrialdeskClient;

/// A [`Repository`] whose backing store is a remote trialdesk server.
///
/// Lets an entity store run against the network exactly as it would against
/// a local repository.
pub struct HttpRepository<T: Entity> {
    client: TrialdeskClient,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> HttpRepository<T> {
    pub fn new(client: TrialdeskClient) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Clone for HttpRepository<T> {
    fn clone(&self) -> Self {
        Self::new(self.client.clone())
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for HttpRepository<T> {
    async fn find_all(&self, filter: &ListFilter) -> Result<Vec<T>> {
        self.client
            .list(filter)
            .await
            .map_err(|e| e.into_repository_error(T::ENTITY_TYPE, None))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<T> {
        self.client
            .get(id)
            .await
            .map_err(|e| e.into_repository_error(T::ENTITY_TYPE, Some(id)))
    }

    async fn create(&self, input: T::Create) -> Result<T> {
        self.client
            .create::<T>(&input)
            .await
            .map_err(|e| e.into_repository_error(T::ENTITY_TYPE, None))
    }

    async fn update(&self, id: Uuid, patch: T::Patch) -> Result<T> {
        self.client
            .update::<T>(id, &patch)
            .await
            .map_err(|e| e.into_repository_error(T::ENTITY_TYPE, Some(id)))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.client
            .delete::<T>(id)
            .await
            .map_err(|e| e.into_repository_error(T::ENTITY_TYPE, Some(id)))
    }

    // The server paginates, so only the requested page crosses the wire.
    async fn find_page(&self, filter: &ListFilter, request: PageRequest) -> Result<Page<T>> {
        self.client
            .list_page(filter, request)
            .await
            .map_err(|e| e.into_repository_error(T::ENTITY_TYPE, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use trialdesk_core::records::{NewTrial, Trial, TrialPatch, TrialPhase, ValidationError};
    use trialdesk_core::response::ApiResponse;
    use trialdesk_core::storage::RepositoryError;

    use crate::store::Stores;

    fn error_body(status: u16, message: &str) -> ApiResponse<serde_json::Value> {
        ApiResponse::error(status, message)
    }

    #[tokio::test]
    async fn test_store_get_by_id_through_http() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        let trial = Trial::from_create(
            id,
            NewTrial::new("Heart Study", "HS-1", TrialPhase::Phase2, "Acme"),
            Utc::now(),
        );
        Mock::given(method("GET"))
            .and(path(format!("/api/trials/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(ApiResponse::success(
                200,
                "Trial retrieved",
                Some(trial.clone()),
            )))
            .mount(&server)
            .await;

        let stores = Stores::new(&TrialdeskClient::new(server.uri()));
        let fetched = stores.trials.get_by_id(id).await.unwrap();

        assert_eq!(fetched, trial);
        assert_eq!(stores.trials.state().selected, Some(trial));
    }

    #[tokio::test]
    async fn test_store_reports_not_found_from_http() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        Mock::given(method("GET"))
            .and(path(format!("/api/trials/{id}")))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(error_body(404, &format!("Trial not found: {id}"))),
            )
            .mount(&server)
            .await;

        let stores = Stores::new(&TrialdeskClient::new(server.uri()));
        let err = stores.trials.get_by_id(id).await.unwrap_err();

        assert_eq!(err.operation, "get_by_id");
        assert_eq!(err.source, RepositoryError::not_found("Trial", id));

        let state = stores.trials.state();
        assert_eq!(state.error, Some(err));
        assert!(!state.loading);
        assert!(state.selected.is_none());
    }

    #[tokio::test]
    async fn test_store_reports_server_rejection_as_validation() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        Mock::given(method("PATCH"))
            .and(path(format!("/api/trials/{id}")))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(error_body(400, "end_date must be on or after start_date")),
            )
            .mount(&server)
            .await;

        let stores = Stores::new(&TrialdeskClient::new(server.uri()));
        let err = stores
            .trials
            .update(id, TrialPatch::default())
            .await
            .unwrap_err();

        assert_eq!(err.operation, "update");
        assert_eq!(
            err.source,
            RepositoryError::Validation(ValidationError::Rejected(
                "end_date must be on or after start_date".to_string()
            ))
        );
    }
}
