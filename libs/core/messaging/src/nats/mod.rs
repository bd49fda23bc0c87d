//! NATS JetStream implementation of the event bus.

mod config;

pub use config::NatsConfig;

use async_trait::async_trait;
use async_nats::jetstream::Context;
use std::sync::Arc;
use tracing::debug;

use crate::bus::{EventBus, EventBusError};
use crate::event::DomainEvent;

/// Event bus backed by NATS JetStream.
///
/// Events are published to the caller-supplied topic (a JetStream
/// subject); the stream covering that subject must already exist, see
/// [`NatsEventBus::ensure_stream`].
pub struct NatsEventBus {
    jetstream: Arc<Context>,
}

impl NatsEventBus {
    /// Create a new event bus over an established JetStream context.
    pub fn new(jetstream: Context) -> Self {
        Self {
            jetstream: Arc::new(jetstream),
        }
    }

    /// Connect to NATS and build the event bus.
    pub async fn connect(config: &NatsConfig) -> Result<Self, EventBusError> {
        let client = async_nats::connect(&config.url)
            .await
            .map_err(|e| EventBusError::Connection(e.to_string()))?;

        Ok(Self::new(async_nats::jetstream::new(client)))
    }

    /// Ensure the stream covering `subjects` exists, creating it if necessary.
    ///
    /// Intended for process startup, not the request path.
    pub async fn ensure_stream(
        &self,
        stream_name: &str,
        subjects: Vec<String>,
    ) -> Result<(), EventBusError> {
        self.jetstream
            .get_or_create_stream(async_nats::jetstream::stream::Config {
                name: stream_name.to_string(),
                subjects,
                ..Default::default()
            })
            .await
            .map_err(|e| EventBusError::Connection(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl EventBus for NatsEventBus {
    async fn publish(&self, topic: &str, events: &[DomainEvent]) -> Result<(), EventBusError> {
        for event in events {
            let bytes = serde_json::to_vec(event)?;

            let ack = self
                .jetstream
                .publish(topic.to_string(), bytes.into())
                .await
                .map_err(|e| EventBusError::publish(topic, e.to_string()))?
                .await
                .map_err(|e| EventBusError::publish(topic, e.to_string()))?;

            debug!(
                subject = %topic,
                sequence = ack.sequence,
                event_id = %event.event_id,
                event_name = %event.event_name,
                "Published domain event"
            );
        }

        Ok(())
    }
}

impl Clone for NatsEventBus {
    fn clone(&self) -> Self {
        Self {
            jetstream: self.jetstream.clone(),
        }
    }
}
