//! # mqtt-delivery
//!
//! `mqtt-delivery` is the delivery-guarantee engine of an MQTT v3 client. It
//! implements the three Quality of Service contracts (at most once, at least
//! once, exactly once) on top of any connection that can send decoded
//! protocol messages and route inbound ones to handlers by type.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `delivery`: the QoS state machine, its in-flight tables and the publish operation.
//! - `message`: the decoded protocol messages the engine reads and writes.
//! - `transport`: the connection contract, the per-type dispatch table and an in-memory connection.
//! - `converter`: publish data converters and the registry the engine builds them from.
//! - `identifier`: scoped 16-bit message identifier allocation.
//! - `config`: loading settings from files and environment variables.
//! - `utils`: error types and logging initialisation.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use mqtt_delivery::converter::ConverterKind;
//! use mqtt_delivery::delivery::DeliveryEngine;
//! use mqtt_delivery::message::{MqttMessage, PublishMessage, QoS};
//! use mqtt_delivery::transport::ChannelConnection;
//!
//! let (tx, mut wire) = tokio::sync::mpsc::unbounded_channel();
//! let connection = Arc::new(ChannelConnection::new(tx));
//! let engine = DeliveryEngine::new(connection.clone(), |msg: &PublishMessage| {
//!     println!("received {} bytes on {}", msg.payload.len(), msg.topic);
//!     true
//! });
//!
//! let id = engine
//!     .publish("sensors/temp", QoS::AtLeastOnce, ConverterKind::UTF8_STRING, &"23.5")
//!     .unwrap();
//! assert!(matches!(wire.try_recv(), Ok(MqttMessage::Publish(_))));
//! assert!(engine.is_publish_pending(id));
//!
//! connection.dispatch(&MqttMessage::PublishAck { message_identifier: id });
//! assert!(!engine.is_publish_pending(id));
//! ```

pub mod config;
pub mod converter;
pub mod delivery;
pub mod identifier;
pub mod message;
pub mod transport;
pub mod utils;

pub use delivery::DeliveryEngine;
pub use utils::error::DeliveryError;
