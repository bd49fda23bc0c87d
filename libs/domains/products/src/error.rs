use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("No products found for sku(s): {}", skus.join(", "))]
    NotFound { skus: Vec<String> },

    #[error("Product with sku '{0}' already exists")]
    DuplicateSku(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    pub fn not_found(sku: impl Into<String>) -> Self {
        Self::NotFound {
            skus: vec![sku.into()],
        }
    }
}

/// Convert ProductError to AppError for standardized error responses.
///
/// The batch variants keep their key lists as structured fields so
/// clients can attribute failures without parsing messages.
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound { skus } => AppError::NotFound(json!({
                "message": format!("No products found for sku(s): {}", skus.join(", ")),
                "skus_not_found": skus,
            })),
            ProductError::DuplicateSku(sku) => AppError::Conflict(json!({
                "message": format!("Product with sku '{}' already exists", sku),
                "skus_already_exists": [sku],
            })),
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::Database(msg) => AppError::InternalServerError(msg),
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<sea_orm::DbErr> for ProductError {
    fn from(err: sea_orm::DbErr) -> Self {
        ProductError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_carries_skus() {
        let err = ProductError::NotFound {
            skus: vec!["A".to_string(), "B".to_string()],
        };
        let app_error: AppError = err.into();
        match app_error {
            AppError::NotFound(payload) => {
                assert_eq!(payload["skus_not_found"], json!(["A", "B"]));
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_sku_is_conflict() {
        let app_error: AppError = ProductError::DuplicateSku("A".to_string()).into();
        match app_error {
            AppError::Conflict(payload) => {
                assert_eq!(payload["skus_already_exists"], json!(["A"]));
            }
            other => panic!("expected Conflict, got {:?}", other),
        }
    }
}
