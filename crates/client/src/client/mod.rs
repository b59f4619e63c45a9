//! HTTP client for the trialdesk API.
//!
//! Every endpoint answers with the same envelope, so the client is generic
//! over the record type and only needs its route.

mod http_repository;

use serde::de::DeserializeOwned;
use uuid::Uuid;

use trialdesk_core::records::Entity;
use trialdesk_core::response::ApiResponse;
use trialdesk_core::storage::{ListFilter, Page, PageRequest};

use crate::error::{ClientError, Result};

pub use http_repository::HttpRepository;

/// HTTP client for the trialdesk API.
#[derive(Debug, Clone)]
pub struct TrialdeskClient {
    client: reqwest::Client,
    base_url: String,
}

impl TrialdeskClient {
    /// Create a new client with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Repository view of one collection.
    pub fn repository<T: Entity>(&self) -> HttpRepository<T> {
        HttpRepository::new(self.clone())
    }

    fn collection_url<T: Entity>(&self) -> String {
        format!("{}/api/{}", self.base_url, T::ROUTE)
    }

    fn record_url<T: Entity>(&self, id: Uuid) -> String {
        format!("{}/api/{}/{}", self.base_url, T::ROUTE, id)
    }

    /// List every record matching `filter`.
    pub async fn list<T: Entity>(&self, filter: &ListFilter) -> Result<Vec<T>> {
        let response = self
            .client
            .get(self.collection_url::<T>())
            .query(filter)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Fetch one page of the records matching `filter`.
    pub async fn list_page<T: Entity>(
        &self,
        filter: &ListFilter,
        request: PageRequest,
    ) -> Result<Page<T>> {
        let response = self
            .client
            .get(self.collection_url::<T>())
            .query(filter)
            .query(&[("page", request.page), ("limit", request.limit)])
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Get a record by ID.
    pub async fn get<T: Entity>(&self, id: Uuid) -> Result<T> {
        let response = self.client.get(self.record_url::<T>(id)).send().await?;
        self.handle_response(response).await
    }

    /// Create a record.
    pub async fn create<T: Entity>(&self, input: &T::Create) -> Result<T> {
        let response = self
            .client
            .post(self.collection_url::<T>())
            .json(input)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Apply a partial update to a record.
    pub async fn update<T: Entity>(&self, id: Uuid, patch: &T::Patch) -> Result<T> {
        let response = self
            .client
            .patch(self.record_url::<T>(id))
            .json(patch)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Delete a record by ID.
    pub async fn delete<T: Entity>(&self, id: Uuid) -> Result<()> {
        let response = self.client.delete(self.record_url::<T>(id)).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        decode_envelope::<serde_json::Value>(status, &body).map(|_| ())
    }

    /// Decode an envelope that must carry data.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        decode_envelope(status, &body)?
            .ok_or_else(|| ClientError::InvalidResponse("response carried no data".to_string()))
    }
}

/// Unwraps a response envelope.
///
/// Success envelopes yield their `data`; error envelopes, and non-envelope
/// bodies on error statuses, become a [`ClientError`] carrying the server's
/// message.
pub(crate) fn decode_envelope<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<Option<T>> {
    let ok_status = (200..300).contains(&status);

    match serde_json::from_slice::<ApiResponse<T>>(body) {
        Ok(envelope) if ok_status && envelope.is_success() => Ok(envelope.data),
        Ok(envelope) => Err(error_for_status(status, envelope.message)),
        Err(err) if ok_status => Err(ClientError::InvalidResponse(err.to_string())),
        Err(_) => Err(error_for_status(
            status,
            String::from_utf8_lossy(body).into_owned(),
        )),
    }
}

fn error_for_status(status: u16, message: String) -> ClientError {
    if status == 404 {
        ClientError::NotFound { message }
    } else {
        ClientError::ServerError { status, message }
    }
}
