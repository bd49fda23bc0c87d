//! Offer Service - Business logic layer

use std::sync::Arc;
use async_trait::async_trait;
use tracing::instrument;
use validator::Validate;

use axum_helpers::PageRequest;
use messaging::{DomainEvent, EventBus};

use crate::error::{OfferError, OfferResult};
use crate::models::{CreateOffer, DeleteOffer, Offer, OfferFilter, UpdateOffer};
use crate::repository::{OfferRepository, ProductLookup};

/// Broker subject for offer domain events.
pub const OFFERS_TOPIC: &str = "catalog.offers";

/// Offer service providing business logic operations
///
/// Besides validation and repository orchestration, this service owns
/// the cross-aggregate rule: offers can only be created for skus that
/// exist in the product catalog. The whole batch is rejected before any
/// persistence when at least one referenced product is missing.
pub struct OfferService<R: OfferRepository, P: ProductLookup> {
    repository: Arc<R>,
    products: Arc<P>,
    event_bus: Arc<dyn EventBus>,
}

impl<R: OfferRepository, P: ProductLookup> OfferService<R, P> {
    /// Create a new OfferService
    pub fn new(repository: R, products: Arc<P>, event_bus: Arc<dyn EventBus>) -> Self {
        Self {
            repository: Arc::new(repository),
            products,
            event_bus,
        }
    }

    /// Create a batch of offers
    ///
    /// All-or-nothing at the validation gate: every offer's sku is
    /// checked against the catalog and all missing skus are collected
    /// before the batch is rejected. An unexpected lookup error aborts
    /// immediately instead of being aggregated.
    #[instrument(skip(self, inputs), fields(batch = inputs.len()))]
    pub async fn create_offers(
        &self,
        inputs: Vec<CreateOffer>,
    ) -> OfferResult<(Vec<Offer>, Vec<String>)> {
        for (index, input) in inputs.iter().enumerate() {
            input.validate().map_err(|e| {
                OfferError::Validation(format!("offer at position {}: {}", index, e))
            })?;
        }

        let mut missing = Vec::new();
        for input in &inputs {
            if !self.products.product_exists(&input.sku).await? {
                missing.push(input.sku.clone());
            }
        }
        if !missing.is_empty() {
            return Err(OfferError::ProductNotFound { skus: missing });
        }

        let offers: Vec<Offer> = inputs.into_iter().map(Into::into).collect();
        let created = self.repository.create(offers).await?;

        let warnings = self.publish("offer.created", &created).await;
        Ok((created, warnings))
    }

    /// List offers with optional filters
    #[instrument(skip(self))]
    pub async fn get_all_offers(
        &self,
        filter: OfferFilter,
        page: PageRequest,
    ) -> OfferResult<Vec<Offer>> {
        self.repository.get_all(filter, page).await
    }

    /// Count offers matching a filter
    #[instrument(skip(self))]
    pub async fn count_offers(&self, filter: OfferFilter) -> OfferResult<u64> {
        self.repository.count(filter).await
    }

    /// Replace `is_published`/`prices` of each submitted offer
    #[instrument(skip(self, inputs), fields(batch = inputs.len()))]
    pub async fn update_full_offers(
        &self,
        inputs: Vec<CreateOffer>,
    ) -> OfferResult<(Vec<Offer>, Vec<String>)> {
        for (index, input) in inputs.iter().enumerate() {
            input.validate().map_err(|e| {
                OfferError::Validation(format!("offer at position {}: {}", index, e))
            })?;
        }

        let offers: Vec<Offer> = inputs.into_iter().map(Into::into).collect();
        let updated = self.repository.update_full(offers).await?;

        let warnings = self.publish("offer.updated", &updated).await;
        Ok((updated, warnings))
    }

    /// Apply only the provided fields of each submitted offer
    #[instrument(skip(self, inputs), fields(batch = inputs.len()))]
    pub async fn update_offers(
        &self,
        inputs: Vec<UpdateOffer>,
    ) -> OfferResult<(Vec<Offer>, Vec<String>)> {
        for (index, input) in inputs.iter().enumerate() {
            input.validate().map_err(|e| {
                OfferError::Validation(format!("offer at position {}: {}", index, e))
            })?;
        }

        let offers: Vec<Offer> = inputs.into_iter().map(Into::into).collect();
        let updated = self.repository.update_partial(offers).await?;

        let warnings = self.publish("offer.updated", &updated).await;
        Ok((updated, warnings))
    }

    /// Delete a batch of offers by sku; returns a summary message.
    #[instrument(skip(self, inputs), fields(batch = inputs.len()))]
    pub async fn delete_offers(
        &self,
        inputs: Vec<DeleteOffer>,
    ) -> OfferResult<(String, Vec<String>)> {
        let skus: Vec<String> = inputs.into_iter().map(|d| d.sku).collect();
        let deleted_count = self.repository.delete(skus.clone()).await?;

        let events: Vec<DomainEvent> = skus
            .iter()
            .map(|sku| {
                DomainEvent::new(sku.clone(), "offer.deleted", serde_json::json!({ "sku": sku }))
            })
            .collect();
        let warnings = self.publish_events(events).await;

        Ok((format!("{} offer(s) deleted", deleted_count), warnings))
    }

    /// Publish one event per offer; broker failures degrade to warnings.
    async fn publish(&self, event_name: &str, offers: &[Offer]) -> Vec<String> {
        let events: Vec<DomainEvent> = offers
            .iter()
            .map(|offer| {
                let event_id = offer
                    .offer_id
                    .clone()
                    .unwrap_or_else(|| offer.sku.clone());
                DomainEvent::new(
                    event_id,
                    event_name,
                    serde_json::to_value(offer).unwrap_or(serde_json::Value::Null),
                )
            })
            .collect();

        self.publish_events(events).await
    }

    async fn publish_events(&self, events: Vec<DomainEvent>) -> Vec<String> {
        match self.event_bus.publish(OFFERS_TOPIC, &events).await {
            Ok(()) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to publish offer events");
                vec![format!("event publish failed: {}", e)]
            }
        }
    }
}

impl<R: OfferRepository, P: ProductLookup> Clone for OfferService<R, P> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            products: Arc::clone(&self.products),
            event_bus: Arc::clone(&self.event_bus),
        }
    }
}

/// The products domain service satisfies the lookup gate directly.
#[async_trait]
impl<R: domain_products::ProductRepository> ProductLookup
    for domain_products::ProductService<R>
{
    async fn product_exists(&self, sku: &str) -> OfferResult<bool> {
        self.exists_by_sku(sku)
            .await
            .map_err(|e| OfferError::Database(format!("Product lookup failed: {}", e)))
    }
}
