use async_trait::async_trait;
use axum_helpers::PageRequest;

use crate::error::OfferResult;
use crate::models::{Offer, OfferFilter};

/// Repository trait for Offer persistence
///
/// Bulk mutations attribute partial failures per key: create raises
/// `AlreadyExists` with the colliding keys partitioned by field, and
/// updates raise `NotFound` with found/missing sku lists when fewer
/// documents matched than were submitted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OfferRepository: Send + Sync {
    /// Insert a batch of offers, allocating an offer id for each from
    /// the shared counter (in input order) before the write.
    async fn create(&self, offers: Vec<Offer>) -> OfferResult<Vec<Offer>>;

    /// List offers matching the filter, one page at a time.
    async fn get_all(&self, filter: OfferFilter, page: PageRequest) -> OfferResult<Vec<Offer>>;

    /// Replace `is_published` and `prices` of each submitted offer;
    /// absent prices are unset.
    async fn update_full(&self, offers: Vec<Offer>) -> OfferResult<Vec<Offer>>;

    /// Apply only the provided fields of each submitted offer.
    async fn update_partial(&self, offers: Vec<Offer>) -> OfferResult<Vec<Offer>>;

    /// Delete a batch by sku; returns how many documents were removed.
    async fn delete(&self, skus: Vec<String>) -> OfferResult<u64>;

    /// Count offers matching the filter.
    async fn count(&self, filter: OfferFilter) -> OfferResult<u64>;
}

/// Cross-aggregate gate: offer creation requires the referenced product
/// to exist in the catalog.
///
/// Implemented by the products domain service; mocked in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductLookup: Send + Sync {
    async fn product_exists(&self, sku: &str) -> OfferResult<bool>;
}
