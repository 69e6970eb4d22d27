//! The `delivery` module implements the three MQTT QoS delivery contracts.
//!
//! Public types:
//! - `DeliveryEngine`: publishes messages and runs the sender and receiver
//!   sides of the QoS 1/2 handshakes.
//! - `OutboundInFlight` / `InboundInFlight`: the per-identifier tables the
//!   engine keeps behind its lock.

pub mod engine;
pub mod inflight;

pub use engine::{DeliveryCallback, DeliveryEngine};
pub use inflight::{InboundInFlight, OutboundInFlight, PendingPublish};
