use axum::response::{IntoResponse, Response};
use trialdesk_core::records::ValidationError;
use trialdesk_core::response::ApiResponse;
use trialdesk_core::storage::{repository_error_to_status_code, RepositoryError};

use super::Envelope;

pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn status_code(&self) -> u16 {
        if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            repository_error_to_status_code(repo_error)
        } else if self.0.downcast_ref::<ValidationError>().is_some() {
            400
        } else {
            500
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let message = self.0.to_string();

        if status_code >= 500 {
            tracing::error!(status = status_code, error = %message, "Request failed");
        } else {
            tracing::warn!(status = status_code, error = %message, "Request rejected");
        }

        Envelope(ApiResponse::<()>::error(status_code, message)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
