use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use messaging::nats::NatsEventBus;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.environment);

    // Connect to PostgreSQL with retry and run migrations
    info!("Connecting to PostgreSQL");
    let db = database::postgres::connect_from_config_with_retry(config.postgres.clone(), None)
        .await?;
    database::postgres::run_migrations::<migration::Migrator>(&db, "catalog_api").await?;

    // Connect to MongoDB with retry
    info!("Connecting to MongoDB at {}", config.mongodb.url());
    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;
    let mongo_db = mongo_client.database(config.mongodb.database());

    // Provision the offers collection: unique indexes and the offer_id
    // counter document (created only if absent; the request path never
    // resets it)
    let offer_repository = domain_offers::MongoOfferRepository::new(&mongo_db);
    offer_repository
        .init_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create offer indexes: {}", e))?;
    offer_repository
        .init_counter()
        .await
        .map_err(|e| eyre::eyre!("Failed to provision the offer_id counter: {}", e))?;

    // Connect to NATS and make sure the catalog stream exists
    info!("Connecting to NATS at {}", config.nats.url);
    let event_bus = NatsEventBus::connect(&config.nats)
        .await
        .map_err(|e| eyre::eyre!("Failed to connect to NATS: {}", e))?;
    event_bus
        .ensure_stream(&config.nats.stream_name, vec![config.nats.subject_wildcard()])
        .await
        .map_err(|e| eyre::eyre!("Failed to ensure the catalog event stream: {}", e))?;

    // Initialize the application state
    let state = AppState {
        config,
        db,
        mongo_client,
    };

    // Build router with API routes
    let api_routes = api::routes(&state, Arc::new(event_bus));

    // Create a router with OpenAPI docs
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;

    // Merge health endpoints
    let app = router.merge(health_router(state.config.app));
    let server_config = state.config.server.clone();

    info!("Starting Catalog API with graceful shutdown (30s timeout)");

    // Production-ready server with graceful shutdown
    create_production_app(
        app,
        &server_config,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing store connections");
            if let Err(e) = state.db.close().await {
                tracing::warn!("Failed to close PostgreSQL connection: {}", e);
            }
            // MongoDB client closes automatically on drop
            drop(state.mongo_client);
            info!("Store connections closed");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}
