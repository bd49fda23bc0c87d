//! Domain event publishing abstractions for the catalog service.
//!
//! This library provides a backend-agnostic event contract:
//! - [`DomainEvent`]: the envelope every published event is wrapped in
//! - [`EventBus`]: the publish trait consumed by application services
//! - `nats` feature: a NATS JetStream implementation of [`EventBus`]
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌───────────────────────────┐
//! │ Domain services  │     │         Backends          │
//! │                  │     │                           │
//! │  ┌────────────┐  │     │   ┌───────────────────┐   │
//! │  │ EventBus   │──│─────│──▶│  NatsEventBus     │   │
//! │  │ (trait)    │  │     │   │  (JetStream)      │   │
//! │  └────────────┘  │     │   └───────────────────┘   │
//! └──────────────────┘     └───────────────────────────┘
//! ```
//!
//! Services treat publishing as a soft-failure path: the mutation has
//! already committed when `publish` runs, so a broker error is reported
//! as a warning on the response, never as a failed request.

mod bus;
mod event;

#[cfg(feature = "nats")]
pub mod nats;

pub use bus::{EventBus, EventBusError};
pub use event::DomainEvent;
