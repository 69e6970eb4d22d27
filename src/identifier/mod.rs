//! Message identifier allocation.
//!
//! Identifiers are 16-bit and scoped: every scope key owns an independent
//! counter. The delivery engine passes the publish topic (or a single shared
//! key, depending on configuration) as the scope.

use std::collections::HashMap;

/// Source of message identifiers consumed by the delivery engine.
///
/// Implementations must not hand out the same identifier twice for publishes
/// that are outstanding at the same time under one scope key.
pub trait IdentifierSource: Send {
    fn next_identifier(&mut self, scope: &str) -> u16;
}

/// Per-scope wrapping counters. The first identifier issued for a scope is 1
/// and 0 is never issued, since MQTT reserves it.
#[derive(Debug, Default)]
pub struct MessageIdentifierDispenser {
    counters: HashMap<String, u16>,
}

impl MessageIdentifierDispenser {
    pub fn new() -> Self {
        Self {
            counters: HashMap::new(),
        }
    }
}

impl IdentifierSource for MessageIdentifierDispenser {
    fn next_identifier(&mut self, scope: &str) -> u16 {
        let counter = self.counters.entry(scope.to_string()).or_insert(0);
        *counter = match counter.checked_add(1) {
            Some(next) => next,
            None => 1,
        };
        *counter
    }
}
