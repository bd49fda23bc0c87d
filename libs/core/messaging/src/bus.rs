//! Event bus trait and error type.

use async_trait::async_trait;
use thiserror::Error;

use crate::event::DomainEvent;

/// Errors surfaced by an [`EventBus`] implementation.
///
/// Kept distinct from generic errors so callers can treat a broker
/// failure as a soft failure (the persisted write is not rolled back).
#[derive(Debug, Error)]
pub enum EventBusError {
    /// The broker rejected or never acknowledged the publish
    #[error("publish to '{topic}' failed: {message}")]
    Publish { topic: String, message: String },

    /// Event could not be serialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Broker connection problem
    #[error("connection error: {0}")]
    Connection(String),
}

impl EventBusError {
    pub fn publish(topic: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Publish {
            topic: topic.into(),
            message: message.into(),
        }
    }
}

/// Publish contract consumed by application services.
///
/// Implementations must deliver all events of a batch to the given topic
/// or return an error; partial delivery reporting is not part of the
/// contract.
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, topic: &str, events: &[DomainEvent]) -> Result<(), EventBusError>;
}
