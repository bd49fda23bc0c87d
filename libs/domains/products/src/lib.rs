//! Products Domain
//!
//! Relational (PostgreSQL) product catalog with bulk CRUD operations and
//! domain-event publication.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, validation, event publication
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + PostgreSQL implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use domain_products::{handlers, postgres::PgProductRepository, service::ProductService};
//! use messaging::nats::{NatsConfig, NatsEventBus};
//!
//! let db = database::postgres::connect("postgresql://localhost/catalog").await?;
//! let bus = NatsEventBus::connect(&NatsConfig::default()).await?;
//!
//! let repository = PgProductRepository::new(db);
//! let service = ProductService::new(repository, Arc::new(bus));
//!
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{
    Attribute, CreateProduct, DeleteProduct, Product, ProductFilter, UpdateProduct,
};
pub use postgres::PgProductRepository;
pub use repository::ProductRepository;
pub use service::{ProductService, PRODUCTS_TOPIC};
