//! The uniform JSON envelope every HTTP endpoint responds with.
//!
//! ```json
//! { "status": "success", "statusCode": 200, "statusText": "OK",
//!   "message": "Trial retrieved", "data": { ... } }
//! ```
//!
//! Errors use the same shape with `status: "error"` and `data: null`.

use serde::{Deserialize, Serialize};

use crate::storage::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub status_code: u16,
    pub status_text: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(status_code: u16, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status: ResponseStatus::Success,
            status_code,
            status_text: status_text(status_code).to_string(),
            message: message.into(),
            data,
        }
    }

    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            status_code,
            status_text: status_text(status_code).to_string(),
            message: message.into(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

/// Payload of a list response: a bare array, or a page object when
/// pagination was requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    All(Vec<T>),
    Page(Page<T>),
}

impl<T> Listing<T> {
    pub fn items(&self) -> &[T] {
        match self {
            Listing::All(items) => items,
            Listing::Page(page) => &page.items,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::All(items) => items,
            Listing::Page(page) => page.items,
        }
    }
}

/// Reason phrase for the status codes this service produces.
pub fn status_text(status_code: u16) -> &'static str {
    match status_code {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        409 => "Conflict",
        415 => "Unsupported Media Type",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let response = ApiResponse::success(201, "Trial created", Some(json!({"title": "A"})));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(
            value,
            json!({
                "status": "success",
                "statusCode": 201,
                "statusText": "Created",
                "message": "Trial created",
                "data": {"title": "A"}
            })
        );
    }

    #[test]
    fn test_error_envelope_has_null_data() {
        let response: ApiResponse<()> = ApiResponse::error(404, "Trial not found: x");
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["status"], "error");
        assert_eq!(value["statusText"], "Not Found");
        assert!(value["data"].is_null());
        assert!(!response.is_success());
    }

    #[test]
    fn test_listing_untagged_forms() {
        let all: Listing<u32> = serde_json::from_value(json!([1, 2])).unwrap();
        assert_eq!(all, Listing::All(vec![1, 2]));

        let page: Listing<u32> = serde_json::from_value(json!({
            "items": [3], "total": 3, "page": 2, "limit": 2
        }))
        .unwrap();
        assert_eq!(page.items(), &[3]);
        assert!(matches!(page, Listing::Page(Page { total: 3, .. })));
    }

    #[test]
    fn test_status_text() {
        assert_eq!(status_text(200), "OK");
        assert_eq!(status_text(503), "Service Unavailable");
        assert_eq!(status_text(299), "Unknown");
    }
}
