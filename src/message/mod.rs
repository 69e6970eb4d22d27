//! Message definitions for the delivery engine
//!
//! `MqttMessage` is the decoded form of the five control packets the engine
//! tracks. Byte-level framing belongs to the transport; the engine only reads
//! and writes the fields modelled here.

pub mod publish;
pub mod qos;

use serde::{Deserialize, Serialize};

pub use publish::PublishMessage;
pub use qos::QoS;

/// MQTT v3 control packet types, valued as in the fixed header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    Connect = 1,
    ConnectAck = 2,
    Publish = 3,
    PublishAck = 4,
    PublishReceived = 5,
    PublishRelease = 6,
    PublishComplete = 7,
    Subscribe = 8,
    SubscribeAck = 9,
    Unsubscribe = 10,
    UnsubscribeAck = 11,
    PingRequest = 12,
    PingResponse = 13,
    Disconnect = 14,
}

impl MessageType {
    pub const COUNT: usize = 14;

    pub const ALL: [MessageType; Self::COUNT] = [
        MessageType::Connect,
        MessageType::ConnectAck,
        MessageType::Publish,
        MessageType::PublishAck,
        MessageType::PublishReceived,
        MessageType::PublishRelease,
        MessageType::PublishComplete,
        MessageType::Subscribe,
        MessageType::SubscribeAck,
        MessageType::Unsubscribe,
        MessageType::UnsubscribeAck,
        MessageType::PingRequest,
        MessageType::PingResponse,
        MessageType::Disconnect,
    ];

    /// Zero-based slot used by enum-indexed tables.
    pub fn index(self) -> usize {
        self as usize - 1
    }
}

/// A decoded protocol message the delivery engine sends or receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MqttMessage {
    #[serde(rename = "publish")]
    Publish(PublishMessage),

    #[serde(rename = "puback")]
    PublishAck { message_identifier: u16 },

    #[serde(rename = "pubrec")]
    PublishReceived { message_identifier: u16 },

    #[serde(rename = "pubrel")]
    PublishRelease { message_identifier: u16 },

    #[serde(rename = "pubcomp")]
    PublishComplete { message_identifier: u16 },
}

impl MqttMessage {
    pub fn message_type(&self) -> MessageType {
        match self {
            MqttMessage::Publish(_) => MessageType::Publish,
            MqttMessage::PublishAck { .. } => MessageType::PublishAck,
            MqttMessage::PublishReceived { .. } => MessageType::PublishReceived,
            MqttMessage::PublishRelease { .. } => MessageType::PublishRelease,
            MqttMessage::PublishComplete { .. } => MessageType::PublishComplete,
        }
    }
}

#[cfg(test)]
mod tests;
