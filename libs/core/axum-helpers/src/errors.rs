use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use utoipa::ToSchema;

/// Standard error response structure.
///
/// Every error response carries the HTTP status and an `errors` object.
/// Plain string messages are normalized into `{"message": ...}` so the
/// `errors` field is always an object; batch errors carry structured
/// key lists (e.g. `skus_not_found`) instead.
///
/// # JSON Example
///
/// ```json
/// {
///   "status": 404,
///   "errors": {
///     "message": "One or more offers were not found",
///     "skus_not_found": ["SKU-3"],
///     "skus_found": ["SKU-1", "SKU-2"]
///   }
/// }
/// ```
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    /// HTTP status code, mirrored into the body
    pub status: u16,
    /// Structured error payload
    pub errors: Value,
}

/// Application error type that can be converted to HTTP responses.
///
/// Domain crates translate their own error enums into this type at the
/// handler boundary; the structured variants (`NotFound`, `Conflict`)
/// accept a JSON payload so batch attribution lists survive the trip to
/// the client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not Found: {0}")]
    NotFound(Value),

    #[error("Conflict: {0}")]
    Conflict(Value),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// Not-found with a plain message payload.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(json!({ "message": message.into() }))
    }

    /// Conflict with a plain message payload.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(json!({ "message": message.into() }))
    }
}

/// Normalize an error payload so clients always receive an object.
fn normalize(errors: Value) -> Value {
    match errors {
        Value::String(message) => json!({ "message": message }),
        other => other,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, errors) = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!("JSON extraction error: {:?}", e);
                (e.status(), Value::String(e.body_text()))
            }
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, Value::String(msg))
            }
            AppError::Validation(msg) => {
                tracing::info!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, Value::String(msg))
            }
            AppError::NotFound(payload) => {
                tracing::info!("Not found: {}", payload);
                (StatusCode::NOT_FOUND, payload)
            }
            AppError::Conflict(payload) => {
                tracing::info!("Conflict: {}", payload);
                (StatusCode::CONFLICT, payload)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, Value::String(msg))
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, Value::String(msg))
            }
        };

        let body = Json(ErrorBody {
            status: status.as_u16(),
            errors: normalize(errors),
        });

        (status, body).into_response()
    }
}

/// Handler for 404 Not Found on unmatched routes.
///
/// Used as the fallback handler in the router.
pub async fn not_found_handler() -> Response {
    AppError::not_found("The requested resource was not found").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_wraps_strings() {
        let normalized = normalize(Value::String("boom".to_string()));
        assert_eq!(normalized, json!({ "message": "boom" }));
    }

    #[test]
    fn test_normalize_keeps_objects() {
        let payload = json!({ "message": "conflict", "skus_already_exists": ["A"] });
        assert_eq!(normalize(payload.clone()), payload);
    }

    #[test]
    fn test_structured_not_found_payload() {
        let err = AppError::NotFound(json!({ "skus_not_found": ["C"] }));
        assert!(format!("{}", err).contains("skus_not_found"));
    }
}
