//! The publish message carried in both directions of the connection.
//!
//! Notes on fields:
//! - `topic`: topic name used for routing; never empty for locally built messages
//! - `qos`: delivery level, decides which handshake follows
//! - `message_identifier`: correlates the publish with its acknowledgments
//! - `retain`: asks the broker to keep the message as the topic's last value
//! - `payload`: opaque bytes produced by a publish data converter

use serde::{Deserialize, Serialize};

use super::qos::QoS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishMessage {
    pub topic: String,
    pub qos: QoS,
    pub message_identifier: u16,
    pub retain: bool,
    pub payload: Vec<u8>,
}

impl PublishMessage {
    /// Start a QoS 0, non-retained message with an empty payload on `topic`.
    pub fn to_topic(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            qos: QoS::AtMostOnce,
            message_identifier: 0,
            retain: false,
            payload: Vec::new(),
        }
    }

    pub fn with_qos(mut self, qos: QoS) -> Self {
        self.qos = qos;
        self
    }

    pub fn with_message_identifier(mut self, message_identifier: u16) -> Self {
        self.message_identifier = message_identifier;
        self
    }

    pub fn retained(mut self, retain: bool) -> Self {
        self.retain = retain;
        self
    }

    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }
}
