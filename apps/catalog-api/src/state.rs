//! Application state management.
//!
//! The domain routers carry their services as their own state; this
//! struct only holds what the app-level endpoints (readiness) and the
//! shutdown path need.

use mongodb::Client;
use sea_orm::DatabaseConnection;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL connection pool (products)
    pub db: DatabaseConnection,
    /// MongoDB client (offers; cloneable, shares the underlying pool)
    pub mongo_client: Client,
}
