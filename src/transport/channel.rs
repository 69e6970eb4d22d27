//! In-memory connection
//!
//! `ChannelConnection` pushes outbound messages into a tokio channel and
//! feeds inbound messages to the handlers registered on it. It stands in for
//! a socket-backed connection in tests and in applications that do the byte
//! framing elsewhere.

use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{ConnectionHandler, MessageDispatcher, MessageHandler};
use crate::message::{MessageType, MqttMessage};

#[derive(Debug)]
pub struct ChannelConnection {
    pub id: String,
    sender: UnboundedSender<MqttMessage>,
    dispatcher: Mutex<MessageDispatcher>,
}

impl ChannelConnection {
    /// Create a connection writing to `sender`. The `id` is a UUID used in
    /// log fields.
    pub fn new(sender: UnboundedSender<MqttMessage>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender,
            dispatcher: Mutex::new(MessageDispatcher::new()),
        }
    }

    /// Feed one inbound message to its registered handler and return the
    /// handler's result. A message with no registered handler is dropped and
    /// reported as unprocessed.
    pub fn dispatch(&self, message: &MqttMessage) -> bool {
        // Handlers may send or register on this connection; the table lock is
        // released before one runs.
        let handler = self
            .dispatcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .handler(message.message_type());

        match handler {
            Some(handler) => handler(message),
            None => {
                debug!(
                    connection = %self.id,
                    message_type = ?message.message_type(),
                    "dropping inbound message with no registered handler"
                );
                false
            }
        }
    }

    /// Dispatch every message received on `inbound` until the channel closes.
    /// Returns how many messages were dispatched.
    pub async fn pump_inbound(&self, mut inbound: UnboundedReceiver<MqttMessage>) -> usize {
        let mut dispatched = 0;
        while let Some(message) = inbound.recv().await {
            self.dispatch(&message);
            dispatched += 1;
        }
        debug!(connection = %self.id, dispatched, "inbound channel closed");
        dispatched
    }

    pub fn is_registered(&self, message_type: MessageType) -> bool {
        self.dispatcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_registered(message_type)
    }
}

impl ConnectionHandler for ChannelConnection {
    fn send_message(&self, message: MqttMessage) {
        if let Err(e) = self.sender.send(message) {
            warn!(
                connection = %self.id,
                message_type = ?e.0.message_type(),
                "outbound channel closed, message dropped"
            );
        }
    }

    fn register_for_message(&self, message_type: MessageType, handler: MessageHandler) {
        self.dispatcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .register(message_type, handler);
    }
}
