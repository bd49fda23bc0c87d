//! Offers Domain
//!
//! Document-store (MongoDB) offers with bulk CRUD operations, a
//! monotonic offer-id allocator, and domain-event publication.
//!
//! An offer references a product by sku; creating offers is gated on the
//! referenced products existing in the relational catalog. Bulk writes
//! report partial failures with per-key attribution: duplicate keys are
//! partitioned by the violated index (`sku` vs `offer_id`), and
//! not-all-matched updates are split into found/missing sku lists.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐       ┌───────────────┐
//! │   Service   │──────▶│ ProductLookup │  ← cross-aggregate gate
//! └──────┬──────┘       └───────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← data access (trait + MongoDB implementation)
//! └─────────────┘
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{OfferError, OfferResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateOffer, Currency, DeleteOffer, Offer, OfferFilter, Price, PriceType, UpdateOffer,
};
pub use mongodb::MongoOfferRepository;
pub use repository::{OfferRepository, ProductLookup};
pub use service::{OfferService, OFFERS_TOPIC};
