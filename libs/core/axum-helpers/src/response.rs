//! Standard success envelope for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::pagination::PaginationMeta;

/// Standard response envelope.
///
/// List endpoints attach pagination `meta`; mutation endpoints may
/// attach `warnings` (e.g. a failed event publish after a committed
/// write). The `message` switches to `success_with_warnings` when any
/// warnings are present.
///
/// # JSON Example
///
/// ```json
/// {
///   "status": 200,
///   "message": "success",
///   "data": [ ... ],
///   "meta": { "page": 1, "count": 2, "total_count": 2, "page_size": 50, "total_pages": 1 }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginationMeta>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 envelope with a data payload.
    pub fn success(data: T) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            message: "success".to_string(),
            data: Some(data),
            meta: None,
            warnings: Vec::new(),
        }
    }

    /// 201 envelope with a data payload.
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED.as_u16(),
            ..Self::success(data)
        }
    }

    /// 200 envelope with just a message (e.g. a deletion summary).
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            message: message.into(),
            data: None,
            meta: None,
            warnings: Vec::new(),
        }
    }

    /// Attach pagination metadata.
    pub fn with_meta(mut self, meta: PaginationMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Attach soft-failure warnings; flips the message when non-empty.
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        if !warnings.is_empty() && self.message == "success" {
            self.message = "success_with_warnings".to_string();
        }
        self.warnings = warnings;
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let response = ApiResponse::success(json!(["a"]));
        assert_eq!(response.status, 200);
        assert_eq!(response.message, "success");
        assert!(response.warnings.is_empty());
    }

    #[test]
    fn test_warnings_flip_message() {
        let response =
            ApiResponse::created(json!([])).with_warnings(vec!["publish failed".to_string()]);
        assert_eq!(response.status, 201);
        assert_eq!(response.message, "success_with_warnings");
    }

    #[test]
    fn test_empty_warnings_keep_message() {
        let response = ApiResponse::success(json!([])).with_warnings(Vec::new());
        assert_eq!(response.message, "success");
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let response: ApiResponse<serde_json::Value> = ApiResponse::message("3 offers deleted");
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("data").is_none());
        assert!(value.get("meta").is_none());
        assert!(value.get("warnings").is_none());
    }
}
