//! Configuration for the NATS event bus.

/// NATS connection and stream settings.
#[derive(Debug, Clone)]
pub struct NatsConfig {
    /// NATS server URL
    pub url: String,

    /// JetStream stream that owns the catalog subjects
    pub stream_name: String,

    /// Subject prefix; topics are published as `<prefix>.<entity>`
    pub subject_prefix: String,
}

impl NatsConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            stream_name: "CATALOG_EVENTS".to_string(),
            subject_prefix: "catalog".to_string(),
        }
    }

    /// Subject pattern covering every topic this service publishes.
    pub fn subject_wildcard(&self) -> String {
        format!("{}.>", self.subject_prefix)
    }

    /// Load from environment variables.
    ///
    /// - `NATS_URL` (default: `nats://localhost:4222`)
    /// - `NATS_STREAM` (default: `CATALOG_EVENTS`)
    /// - `NATS_SUBJECT_PREFIX` (default: `catalog`)
    pub fn from_env() -> Self {
        let url =
            std::env::var("NATS_URL").unwrap_or_else(|_| "nats://localhost:4222".to_string());
        let stream_name =
            std::env::var("NATS_STREAM").unwrap_or_else(|_| "CATALOG_EVENTS".to_string());
        let subject_prefix =
            std::env::var("NATS_SUBJECT_PREFIX").unwrap_or_else(|_| "catalog".to_string());

        Self {
            url,
            stream_name,
            subject_prefix,
        }
    }
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self::new("nats://localhost:4222")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NatsConfig::default();
        assert_eq!(config.url, "nats://localhost:4222");
        assert_eq!(config.stream_name, "CATALOG_EVENTS");
        assert_eq!(config.subject_wildcard(), "catalog.>");
    }
}
