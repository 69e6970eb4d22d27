use serde::{Deserialize, Serialize};

use crate::utils::error::DeliveryError;

/// Quality of Service levels for MQTT messages.
///
/// QoS defines the guarantee of delivery for a specific message. Higher levels
/// need a longer acknowledgment handshake and per-identifier state on both
/// sides of the connection.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum QoS {
    /// **QoS 0**: fire and forget. No acknowledgment, no state.
    AtMostOnce = 0,

    /// **QoS 1**: acknowledged with a single PublishAck. Duplicates are possible.
    AtLeastOnce = 1,

    /// **QoS 2**: four-step Publish / Received / Release / Complete handshake.
    ExactlyOnce = 2,
}

impl QoS {
    /// Whether a publish at this level must be tracked until acknowledged.
    pub fn requires_handshake(self) -> bool {
        !matches!(self, QoS::AtMostOnce)
    }
}

impl TryFrom<u8> for QoS {
    type Error = DeliveryError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(QoS::AtMostOnce),
            1 => Ok(QoS::AtLeastOnce),
            2 => Ok(QoS::ExactlyOnce),
            other => Err(DeliveryError::InvalidQos(other)),
        }
    }
}

impl From<QoS> for u8 {
    fn from(qos: QoS) -> Self {
        qos as u8
    }
}
