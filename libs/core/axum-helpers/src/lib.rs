//! # Axum Helpers
//!
//! A collection of utilities and helpers shared by the catalog HTTP APIs.
//!
//! ## Modules
//!
//! - **[`errors`]**: structured error responses (`{status, errors}`)
//! - **[`pagination`]**: pagination metadata calculator and query params
//! - **[`response`]**: standard success envelope (`{status, message, data, meta, warnings}`)
//! - **[`server`]**: server setup, health checks, graceful shutdown
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::{app_info, server::ServerConfig};
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_routes = Router::new(); // Add your routes
//!     let router = create_router::<ApiDoc>(api_routes).await?;
//!     let app = router.merge(health_router(app_info!()));
//!
//!     create_production_app(app, &ServerConfig::default(), std::time::Duration::from_secs(30), async {})
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod pagination;
pub mod response;
pub mod server;

// Re-export error types
pub use errors::{AppError, ErrorBody};

// Re-export pagination types
pub use pagination::{PageQuery, PageRequest, PaginationMeta};

// Re-export the response envelope
pub use response::ApiResponse;

// Re-export server types
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_app, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};
