use std::collections::HashMap;

use crate::message::PublishMessage;

/// A locally initiated QoS 1/2 publish the broker has not finished acknowledging.
#[derive(Debug, Clone)]
pub struct PendingPublish {
    pub message: PublishMessage,
    /// Milliseconds since UNIX epoch when the publish was recorded.
    pub recorded_at: i64,
}

/// Outbound publishes keyed by message identifier.
#[derive(Debug, Default)]
pub struct OutboundInFlight {
    entries: HashMap<u16, PendingPublish>,
}

impl OutboundInFlight {
    /// Empty table.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Track `message` under its identifier. Returns `false` and leaves the
    /// existing entry in place if the identifier is already tracked.
    pub fn record(&mut self, message: PublishMessage) -> bool {
        let id = message.message_identifier;
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries.insert(
            id,
            PendingPublish {
                message,
                recorded_at: chrono::Utc::now().timestamp_millis(),
            },
        );
        true
    }

    /// Whether `id` is in flight. The engine consults this before handing
    /// out an identifier, so no two outbound publishes share one.
    pub fn contains(&self, id: u16) -> bool {
        self.entries.contains_key(&id)
    }

    /// The tracked publish for `id`, with the time it was recorded.
    pub fn get(&self, id: u16) -> Option<&PendingPublish> {
        self.entries.get(&id)
    }

    /// Stop tracking `id`, returning the entry if there was one.
    pub fn complete(&mut self, id: u16) -> Option<PendingPublish> {
        self.entries.remove(&id)
    }

    /// Identifiers in ascending order.
    pub fn identifiers(&self) -> Vec<u16> {
        let mut ids: Vec<u16> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

/// QoS 2 publishes received from the broker and awaiting PublishRelease.
#[derive(Debug, Default)]
pub struct InboundInFlight {
    entries: HashMap<u16, PublishMessage>,
}

impl InboundInFlight {
    /// Empty table.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Store `message` unless its identifier is already stored. A redelivered
    /// publish never replaces the first copy. Returns whether it was stored.
    pub fn store_once(&mut self, message: PublishMessage) -> bool {
        match self.entries.entry(message.message_identifier) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(message);
                true
            }
        }
    }

    /// Whether a publish with `id` is held awaiting its release.
    pub fn contains(&self, id: u16) -> bool {
        self.entries.contains_key(&id)
    }

    /// Remove and return the stored message for `id`.
    pub fn release(&mut self, id: u16) -> Option<PublishMessage> {
        self.entries.remove(&id)
    }

    /// Identifiers in ascending order.
    pub fn identifiers(&self) -> Vec<u16> {
        let mut ids: Vec<u16> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
