use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OfferError {
    /// A bulk update matched fewer offers than submitted. Every
    /// submitted sku lands in exactly one of the two lists.
    #[error("One or more offers were not found. {} offer(s) were updated", skus_found.len())]
    NotFound {
        skus_not_found: Vec<String>,
        skus_found: Vec<String>,
    },

    /// A bulk insert hit unique-constraint violations, partitioned by
    /// the violated field.
    #[error("Offers already exist for sku(s) [{}] / offer id(s) [{}]", skus.join(", "), offer_ids.join(", "))]
    AlreadyExists {
        skus: Vec<String>,
        offer_ids: Vec<String>,
    },

    /// Offer creation referenced products that do not exist; nothing
    /// was persisted.
    #[error("No products found for sku(s): {}", skus.join(", "))]
    ProductNotFound { skus: Vec<String> },

    /// The offer_id counter document is missing from the store.
    #[error("Cannot allocate an offer id: counter not initialized")]
    CounterNotInitialized,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type OfferResult<T> = Result<T, OfferError>;

/// Convert OfferError to AppError for standardized error responses.
///
/// Partial-batch variants keep their key lists as structured fields so
/// a client can reconstruct which keys succeeded and which failed.
impl From<OfferError> for AppError {
    fn from(err: OfferError) -> Self {
        match err {
            OfferError::NotFound {
                skus_not_found,
                skus_found,
            } => {
                let mut payload = json!({
                    "message": format!(
                        "One or more offers were not found. {} offer(s) were updated",
                        skus_found.len()
                    ),
                    "skus_not_found": skus_not_found,
                });
                if !skus_found.is_empty() {
                    payload["skus_found"] = json!(skus_found);
                }
                AppError::NotFound(payload)
            }
            OfferError::AlreadyExists { skus, offer_ids } => {
                let mut payload = json!({
                    "message": "Offers could not be created, sku and/or offer_id already exist",
                });
                if !skus.is_empty() {
                    payload["skus_already_exists"] = json!(skus);
                }
                if !offer_ids.is_empty() {
                    payload["offer_id_already_exists"] = json!(offer_ids);
                }
                AppError::Conflict(payload)
            }
            OfferError::ProductNotFound { skus } => AppError::NotFound(json!({
                "message": format!("No products found for sku(s): {}", skus.join(", ")),
                "skus_not_found": skus,
            })),
            OfferError::CounterNotInitialized => AppError::InternalServerError(
                "Cannot allocate an offer id: counter not initialized".to_string(),
            ),
            OfferError::Validation(msg) => AppError::BadRequest(msg),
            OfferError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for OfferError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for OfferError {
    fn from(err: mongodb::error::Error) -> Self {
        OfferError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_payload_partitions_keys() {
        let err = OfferError::NotFound {
            skus_not_found: vec!["C".to_string()],
            skus_found: vec!["A".to_string(), "B".to_string()],
        };

        let app_error: AppError = err.into();
        match app_error {
            AppError::NotFound(payload) => {
                assert_eq!(payload["skus_not_found"], json!(["C"]));
                assert_eq!(payload["skus_found"], json!(["A", "B"]));
                assert!(
                    payload["message"]
                        .as_str()
                        .unwrap()
                        .contains("2 offer(s) were updated")
                );
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_not_found_with_zero_updates() {
        let err = OfferError::NotFound {
            skus_not_found: vec!["A".to_string()],
            skus_found: Vec::new(),
        };

        let app_error: AppError = err.into();
        match app_error {
            AppError::NotFound(payload) => {
                assert!(
                    payload["message"]
                        .as_str()
                        .unwrap()
                        .contains("0 offer(s) were updated")
                );
                assert!(payload.get("skus_found").is_none());
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_already_exists_payload() {
        let err = OfferError::AlreadyExists {
            skus: vec!["A".to_string()],
            offer_ids: vec!["7".to_string()],
        };

        let app_error: AppError = err.into();
        match app_error {
            AppError::Conflict(payload) => {
                assert_eq!(payload["skus_already_exists"], json!(["A"]));
                assert_eq!(payload["offer_id_already_exists"], json!(["7"]));
            }
            other => panic!("expected Conflict, got {:?}", other),
        }
    }
}
