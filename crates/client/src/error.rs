//! Client error types.

use thiserror::Error;
use uuid::Uuid;

use trialdesk_core::records::ValidationError;
use trialdesk_core::storage::RepositoryError;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Resource not found: {message}")]
    NotFound { message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    /// Translates a transport failure into the repository taxonomy.
    ///
    /// `id` names the record the call was about, if any.
    pub fn into_repository_error(self, entity_type: &'static str, id: Option<Uuid>) -> RepositoryError {
        let id_text = || id.map(|id| id.to_string()).unwrap_or_else(|| "*".to_string());

        match self {
            ClientError::NotFound { .. } => RepositoryError::NotFound {
                entity_type,
                id: id_text(),
            },
            ClientError::ServerError { status, message } => match status {
                400 | 422 => ValidationError::Rejected(message).into(),
                409 => RepositoryError::AlreadyExists {
                    entity_type,
                    id: id_text(),
                },
                503 => RepositoryError::ConnectionFailed(message),
                _ => RepositoryError::QueryFailed(message),
            },
            ClientError::Request(err) if err.is_connect() || err.is_timeout() => {
                RepositoryError::ConnectionFailed(err.to_string())
            }
            ClientError::Request(err) => RepositoryError::QueryFailed(err.to_string()),
            ClientError::InvalidResponse(message) => RepositoryError::Serialization(message),
            ClientError::InvalidInput(message) => ValidationError::Rejected(message).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_keeps_entity_and_id() {
        let id = Uuid::new_v4();
        let err = ClientError::NotFound {
            message: "Trial not found".to_string(),
        }
        .into_repository_error("Trial", Some(id));

        assert_eq!(err, RepositoryError::not_found("Trial", id));
    }

    #[test]
    fn test_server_status_mapping() {
        let server = |status| ClientError::ServerError {
            status,
            message: "nope".to_string(),
        };

        assert_eq!(
            server(400).into_repository_error("Site", None),
            RepositoryError::Validation(ValidationError::Rejected("nope".to_string()))
        );
        assert!(matches!(
            server(422).into_repository_error("Site", None),
            RepositoryError::Validation(_)
        ));
        assert!(matches!(
            server(409).into_repository_error("Site", None),
            RepositoryError::AlreadyExists { .. }
        ));
        assert!(matches!(
            server(503).into_repository_error("Site", None),
            RepositoryError::ConnectionFailed(_)
        ));
        assert!(matches!(
            server(500).into_repository_error("Site", None),
            RepositoryError::QueryFailed(_)
        ));
    }

    #[test]
    fn test_rejection_keeps_server_message_and_status() {
        let err = ClientError::ServerError {
            status: 400,
            message: "end_date must be on or after start_date".to_string(),
        }
        .into_repository_error("Trial", None);

        assert_eq!(err.to_string(), "end_date must be on or after start_date");
        assert_eq!(trialdesk_core::storage::repository_error_to_status_code(&err), 400);
    }
}
