//! Domain event envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wire format identifier for JSON-encoded payloads.
pub const DATA_FORMAT_JSON: &str = "JSON";

/// An immutable record describing a completed state change, published
/// for downstream consumers.
///
/// `event_id` is the aggregate key (a product sku or an offer id) so
/// consumers can partition/order per entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Aggregate identifier (sku / offer id)
    pub event_id: String,

    /// Event name, e.g. `product.created`
    pub event_name: String,

    /// Payload encoding, e.g. `JSON`
    pub event_data_format: String,

    /// ISO-8601 creation date
    pub creation_date: DateTime<Utc>,

    /// Epoch milliseconds, for consumers that want a numeric clock
    pub timestamp: i64,

    /// Serialized aggregate snapshot
    pub payload: serde_json::Value,
}

impl DomainEvent {
    /// Create a new JSON event stamped with the current time.
    pub fn new(
        event_id: impl Into<String>,
        event_name: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            event_id: event_id.into(),
            event_name: event_name.into(),
            event_data_format: DATA_FORMAT_JSON.to_string(),
            creation_date: now,
            timestamp: now.timestamp_millis(),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_event_defaults() {
        let event = DomainEvent::new("SKU-1", "product.created", json!({"sku": "SKU-1"}));

        assert_eq!(event.event_id, "SKU-1");
        assert_eq!(event.event_name, "product.created");
        assert_eq!(event.event_data_format, DATA_FORMAT_JSON);
        assert_eq!(event.timestamp, event.creation_date.timestamp_millis());
    }

    #[test]
    fn test_event_serialization_shape() {
        let event = DomainEvent::new("42", "offer.updated", json!({"offer_id": "42"}));
        let value = serde_json::to_value(&event).unwrap();

        assert!(value.get("event_id").is_some());
        assert!(value.get("event_name").is_some());
        assert!(value.get("event_data_format").is_some());
        assert!(value.get("creation_date").is_some());
        assert!(value.get("timestamp").is_some());
        assert!(value.get("payload").is_some());
    }
}
