//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use axum_helpers::PageRequest;
use messaging::{DomainEvent, EventBus};

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, DeleteProduct, Product, ProductFilter, UpdateProduct};
use crate::repository::ProductRepository;

/// Broker subject for product domain events.
pub const PRODUCTS_TOPIC: &str = "catalog.products";

/// Product service providing business logic operations
///
/// The service layer validates each batch element, orchestrates
/// repository calls, and publishes domain events after a successful
/// write. Publishing is a soft-failure path: a broker error is returned
/// as a warning string, never as an error, because the write has
/// already committed.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    event_bus: Arc<dyn EventBus>,
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository and event bus
    pub fn new(repository: R, event_bus: Arc<dyn EventBus>) -> Self {
        Self {
            repository: Arc::new(repository),
            event_bus,
        }
    }

    /// Create a batch of products
    #[instrument(skip(self, inputs), fields(batch = inputs.len()))]
    pub async fn create_products(
        &self,
        inputs: Vec<CreateProduct>,
    ) -> ProductResult<(Vec<Product>, Vec<String>)> {
        for (index, input) in inputs.iter().enumerate() {
            input.validate().map_err(|e| {
                ProductError::Validation(format!("product at position {}: {}", index, e))
            })?;
        }

        let products: Vec<Product> = inputs.into_iter().map(Into::into).collect();
        let created = self.repository.create(products).await?;

        let warnings = self.publish("product.created", &created).await;
        Ok((created, warnings))
    }

    /// List products with optional filters
    #[instrument(skip(self))]
    pub async fn get_all_products(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> ProductResult<Vec<Product>> {
        self.repository.get_all(filter, page).await
    }

    /// Count products matching a filter
    #[instrument(skip(self))]
    pub async fn count_products(&self, filter: ProductFilter) -> ProductResult<u64> {
        self.repository.count(filter).await
    }

    /// Get a product by sku (list shape on the wire)
    #[instrument(skip(self))]
    pub async fn get_product_by_sku(&self, sku: &str) -> ProductResult<Vec<Product>> {
        let products = self.repository.get_by_sku(sku).await?;
        if products.is_empty() {
            return Err(ProductError::not_found(sku));
        }
        Ok(products)
    }

    /// Check whether a product sku exists (consumed by the offers domain)
    #[instrument(skip(self))]
    pub async fn exists_by_sku(&self, sku: &str) -> ProductResult<bool> {
        self.repository.exists_by_sku(sku).await
    }

    /// Replace every field of each submitted product
    #[instrument(skip(self, inputs), fields(batch = inputs.len()))]
    pub async fn update_full_products(
        &self,
        inputs: Vec<CreateProduct>,
    ) -> ProductResult<(Vec<Product>, Vec<String>)> {
        for (index, input) in inputs.iter().enumerate() {
            input.validate().map_err(|e| {
                ProductError::Validation(format!("product at position {}: {}", index, e))
            })?;
        }

        let products: Vec<Product> = inputs.into_iter().map(Into::into).collect();
        let updated = self.repository.update_full(products).await?;

        let warnings = self.publish("product.updated", &updated).await;
        Ok((updated, warnings))
    }

    /// Apply only the provided fields of each submitted update
    #[instrument(skip(self, inputs), fields(batch = inputs.len()))]
    pub async fn update_products(
        &self,
        inputs: Vec<UpdateProduct>,
    ) -> ProductResult<(Vec<Product>, Vec<String>)> {
        for (index, input) in inputs.iter().enumerate() {
            input.validate().map_err(|e| {
                ProductError::Validation(format!("product at position {}: {}", index, e))
            })?;
        }

        let updated = self.repository.update_partial(inputs).await?;

        let warnings = self.publish("product.updated", &updated).await;
        Ok((updated, warnings))
    }

    /// Delete a batch of products by sku
    #[instrument(skip(self, inputs), fields(batch = inputs.len()))]
    pub async fn delete_products(
        &self,
        inputs: Vec<DeleteProduct>,
    ) -> ProductResult<(Vec<Product>, Vec<String>)> {
        let skus: Vec<String> = inputs.into_iter().map(|d| d.sku).collect();
        let deleted = self.repository.delete(skus).await?;

        let warnings = self.publish("product.deleted", &deleted).await;
        Ok((deleted, warnings))
    }

    /// Publish one event per product; broker failures degrade to warnings.
    async fn publish(&self, event_name: &str, products: &[Product]) -> Vec<String> {
        let events: Vec<DomainEvent> = products
            .iter()
            .map(|product| {
                DomainEvent::new(
                    product.sku.clone(),
                    event_name,
                    serde_json::to_value(product).unwrap_or(serde_json::Value::Null),
                )
            })
            .collect();

        match self.event_bus.publish(PRODUCTS_TOPIC, &events).await {
            Ok(()) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, event_name, "Failed to publish product events");
                vec![format!("event publish failed: {}", e)]
            }
        }
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            event_bus: Arc::clone(&self.event_bus),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockProductRepository;
    use async_trait::async_trait;
    use messaging::EventBusError;
    use std::sync::Mutex;

    /// Test double that records published events and can be told to fail.
    struct RecordingEventBus {
        fail: bool,
        published: Mutex<Vec<(String, Vec<DomainEvent>)>>,
    }

    impl RecordingEventBus {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                fail,
                published: Mutex::new(Vec::new()),
            })
        }

        fn published_count(&self) -> usize {
            self.published
                .lock()
                .unwrap()
                .iter()
                .map(|(_, events)| events.len())
                .sum()
        }
    }

    #[async_trait]
    impl EventBus for RecordingEventBus {
        async fn publish(
            &self,
            topic: &str,
            events: &[DomainEvent],
        ) -> Result<(), EventBusError> {
            if self.fail {
                return Err(EventBusError::publish(topic, "broker unavailable"));
            }
            self.published
                .lock()
                .unwrap()
                .push((topic.to_string(), events.to_vec()));
            Ok(())
        }
    }

    fn create_input(sku: &str) -> CreateProduct {
        CreateProduct {
            sku: sku.to_string(),
            parent_sku: None,
            title: "Shirt".to_string(),
            category_code: "apparel".to_string(),
            category_name: None,
            description: "A shirt".to_string(),
            short_description: None,
            is_published: true,
            attributes: None,
        }
    }

    #[tokio::test]
    async fn test_create_products_publishes_events() {
        let mut repository = MockProductRepository::new();
        repository
            .expect_create()
            .times(1)
            .returning(|products| Ok(products));

        let bus = RecordingEventBus::new(false);
        let service = ProductService::new(repository, bus.clone());

        let (created, warnings) = service
            .create_products(vec![create_input("SKU-1"), create_input("SKU-2")])
            .await
            .unwrap();

        assert_eq!(created.len(), 2);
        assert!(warnings.is_empty());
        assert_eq!(bus.published_count(), 2);
    }

    #[tokio::test]
    async fn test_create_products_validation_short_circuits() {
        let mut repository = MockProductRepository::new();
        repository.expect_create().times(0);

        let service = ProductService::new(repository, RecordingEventBus::new(false));

        let mut bad = create_input("SKU-1");
        bad.title = "".to_string();

        let err = service.create_products(vec![bad]).await.unwrap_err();
        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_publish_failure_becomes_warning() {
        let mut repository = MockProductRepository::new();
        repository.expect_create().returning(|products| Ok(products));

        let service = ProductService::new(repository, RecordingEventBus::new(true));

        let (created, warnings) = service
            .create_products(vec![create_input("SKU-1")])
            .await
            .unwrap();

        assert_eq!(created.len(), 1);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("event publish failed"));
    }

    #[tokio::test]
    async fn test_get_product_by_sku_not_found() {
        let mut repository = MockProductRepository::new();
        repository.expect_get_by_sku().returning(|_| Ok(Vec::new()));

        let service = ProductService::new(repository, RecordingEventBus::new(false));

        let err = service.get_product_by_sku("missing").await.unwrap_err();
        match err {
            ProductError::NotFound { skus } => assert_eq!(skus, vec!["missing".to_string()]),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_products_publishes_deleted_events() {
        let mut repository = MockProductRepository::new();
        repository
            .expect_delete()
            .withf(|skus| *skus == ["SKU-1".to_string()])
            .returning(|skus| Ok(skus.into_iter().map(Product::from_sku).collect()));

        let bus = RecordingEventBus::new(false);
        let service = ProductService::new(repository, bus.clone());

        let (deleted, warnings) = service
            .delete_products(vec![DeleteProduct {
                sku: "SKU-1".to_string(),
            }])
            .await
            .unwrap();

        assert_eq!(deleted.len(), 1);
        assert!(warnings.is_empty());
        assert_eq!(bus.published_count(), 1);
    }

    #[tokio::test]
    async fn test_partial_update_resubmission_is_idempotent() {
        // A fully-applied resubmission matches every sku again, so the
        // repository reports success and no NotFound is raised.
        let mut repository = MockProductRepository::new();
        repository
            .expect_update_partial()
            .times(2)
            .returning(|updates| {
                Ok(updates
                    .into_iter()
                    .map(|u| Product::from_sku(u.sku))
                    .collect())
            });

        let service = ProductService::new(repository, RecordingEventBus::new(false));

        let update = UpdateProduct {
            sku: "SKU-1".to_string(),
            parent_sku: None,
            title: Some("Shirt".to_string()),
            category_code: None,
            category_name: None,
            description: None,
            short_description: None,
            is_published: None,
            attributes: None,
        };

        let (first, _) = service.update_products(vec![update.clone()]).await.unwrap();
        let (second, _) = service.update_products(vec![update]).await.unwrap();
        assert_eq!(first, second);
    }
}
