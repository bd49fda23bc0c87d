//! API routes module
//!
//! Wires the domain routers together. Note: these are nested under
//! `/api` by `axum_helpers::create_router`.

pub mod health;

use axum::Router;
use std::sync::Arc;

use domain_offers::{MongoOfferRepository, OfferService};
use domain_products::{PgProductRepository, ProductService};
use messaging::EventBus;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState, event_bus: Arc<dyn EventBus>) -> Router {
    let mongo_db = state.mongo_client.database(state.config.mongodb.database());

    let product_service = ProductService::new(
        PgProductRepository::new(state.db.clone()),
        Arc::clone(&event_bus),
    );
    // The products service doubles as the offer-creation product gate
    let product_gate = Arc::new(product_service.clone());

    let offer_service = OfferService::new(
        MongoOfferRepository::new(&mongo_db),
        product_gate,
        event_bus,
    );

    Router::new()
        .nest("/products", domain_products::handlers::router(product_service))
        .nest("/offers", domain_offers::handlers::router(offer_service))
        .merge(health::router(state.clone()))
}
