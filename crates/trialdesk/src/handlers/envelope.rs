//! HTTP rendering of the response envelope and the request extractors that
//! report their failures through it.

use std::collections::BTreeMap;

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use trialdesk_core::records::ValidationError;
use trialdesk_core::response::ApiResponse;

use super::AppError;

/// An [`ApiResponse`] sent with its own status code.
pub struct Envelope<T>(pub ApiResponse<T>);

impl<T> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self(ApiResponse::success(200, message, Some(data)))
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self(ApiResponse::success(201, message, Some(data)))
    }
}

impl Envelope<()> {
    /// A success envelope whose `data` is `null`.
    pub fn empty(message: impl Into<String>) -> Self {
        Self(ApiResponse::success(200, message, None))
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0)).into_response()
    }
}

/// JSON request body; a body that cannot be decoded is a 400 envelope.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ValidationError::MalformedBody(rejection.body_text()).into()),
        }
    }
}

/// Raw query parameters of a list request.
pub struct QueryParams(pub BTreeMap<String, String>);

impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<BTreeMap<String, String>>::from_request_parts(parts, state).await {
            Ok(Query(params)) => Ok(Self(params)),
            Err(rejection) => Err(ValidationError::InvalidParameter {
                name: "query".to_string(),
                reason: rejection.body_text(),
            }
            .into()),
        }
    }
}

/// Record identifier taken from the `{id}` path segment.
pub struct RecordId(pub Uuid);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<Uuid>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(Self(id)),
            Err(_) => Err(ValidationError::InvalidParameter {
                name: "id".to_string(),
                reason: "must be a UUID".to_string(),
            }
            .into()),
        }
    }
}
