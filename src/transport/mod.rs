//! The `transport` module is the boundary between the delivery engine and
//! the connection carrying protocol messages to and from the broker.
//!
//! It defines the `ConnectionHandler` contract the engine consumes, the
//! enum-indexed `MessageDispatcher` that routes inbound messages to handlers
//! by type, and `ChannelConnection`, an in-memory connection over tokio
//! channels.

pub mod channel;
pub mod dispatch;

use std::sync::Arc;

use crate::message::{MessageType, MqttMessage};

pub use channel::ChannelConnection;
pub use dispatch::MessageDispatcher;

/// Handler invoked for one inbound message. The boolean is the handler's
/// processing result, reported back to the transport.
pub type MessageHandler = Arc<dyn Fn(&MqttMessage) -> bool + Send + Sync>;

/// The connection as seen by the delivery engine.
pub trait ConnectionHandler: Send + Sync {
    /// Hand a fully formed message to the wire. Fire and forget.
    fn send_message(&self, message: MqttMessage);

    /// Route every future inbound message of `message_type` to `handler`,
    /// replacing any handler already registered for that type.
    fn register_for_message(&self, message_type: MessageType, handler: MessageHandler);
}
