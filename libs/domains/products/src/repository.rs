use async_trait::async_trait;
use axum_helpers::PageRequest;

use crate::error::ProductResult;
use crate::models::{Product, ProductFilter, UpdateProduct};

/// Repository trait for Product persistence
///
/// All mutating operations act on batches and are transactional: either
/// every submitted product is applied or none is, with the offending
/// sku(s) reported in the error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a batch of products; fails with `DuplicateSku` on the
    /// first unique-constraint violation.
    async fn create(&self, products: Vec<Product>) -> ProductResult<Vec<Product>>;

    /// List products matching the filter, one page at a time.
    async fn get_all(&self, filter: ProductFilter, page: PageRequest)
        -> ProductResult<Vec<Product>>;

    /// Fetch a product by sku; the list shape mirrors the wire contract
    /// (empty when absent).
    async fn get_by_sku(&self, sku: &str) -> ProductResult<Vec<Product>>;

    /// Replace every field of each submitted product.
    async fn update_full(&self, products: Vec<Product>) -> ProductResult<Vec<Product>>;

    /// Apply only the provided fields of each submitted update.
    async fn update_partial(&self, updates: Vec<UpdateProduct>) -> ProductResult<Vec<Product>>;

    /// Delete a batch by sku; returns the deleted products (sku only).
    async fn delete(&self, skus: Vec<String>) -> ProductResult<Vec<Product>>;

    /// Count products matching the filter.
    async fn count(&self, filter: ProductFilter) -> ProductResult<u64>;

    /// Check whether a sku exists in the catalog.
    async fn exists_by_sku(&self, sku: &str) -> ProductResult<bool>;
}
