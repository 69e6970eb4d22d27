use std::sync::Arc;

use super::MessageHandler;
use crate::message::MessageType;

/// Dispatch table with one slot per MQTT v3 message type.
///
/// The table only stores handlers. Callers look a handler up, release
/// whatever guards the table and then run it, so a handler may register or
/// send on the same connection.
#[derive(Default)]
pub struct MessageDispatcher {
    handlers: [Option<MessageHandler>; MessageType::COUNT],
}

impl MessageDispatcher {
    /// Table with every slot empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handler` for `message_type`, replacing any earlier one.
    pub fn register(&mut self, message_type: MessageType, handler: MessageHandler) {
        self.handlers[message_type.index()] = Some(handler);
    }

    /// A shared handle to the handler for `message_type`. `None` means
    /// messages of that type are dropped unprocessed.
    pub fn handler(&self, message_type: MessageType) -> Option<MessageHandler> {
        self.handlers[message_type.index()].as_ref().map(Arc::clone)
    }

    pub fn is_registered(&self, message_type: MessageType) -> bool {
        self.handlers[message_type.index()].is_some()
    }
}

impl std::fmt::Debug for MessageDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registered: Vec<_> = MessageType::ALL
            .iter()
            .filter(|t| self.is_registered(**t))
            .collect();
        f.debug_struct("MessageDispatcher")
            .field("registered", &registered)
            .finish()
    }
}
