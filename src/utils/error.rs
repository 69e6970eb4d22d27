//! The `error` module defines the error types surfaced by the delivery engine.
//!
//! The publish path and QoS decoding are the only fallible operations.
//! Inbound handshake handlers never return errors: unknown identifiers are
//! benign and are reported through the handler's boolean result instead.

use thiserror::Error;

use crate::converter::ConverterKind;

/// Errors surfaced by the crate.
///
/// Every variant except `InvalidQos` is returned synchronously from
/// [`DeliveryEngine::publish`](crate::delivery::DeliveryEngine::publish). None
/// of those leave partial state behind: when a publish fails no identifier has
/// been drawn and no in-flight entry has been recorded.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("publish topic must not be empty")]
    EmptyTopic,

    #[error("no converter registered for kind `{0}`")]
    UnknownConverter(ConverterKind),

    #[error("failed to construct converter `{kind}`: {reason}")]
    ConverterConstruction { kind: ConverterKind, reason: String },

    #[error("converter `{kind}` rejected publish data: {source}")]
    Conversion {
        kind: ConverterKind,
        #[source]
        source: ConversionError,
    },

    #[error("every message identifier is currently in flight")]
    IdentifiersExhausted,

    /// A QoS level outside 0..=2, rejected by `QoS::try_from` and therefore
    /// by message deserialization.
    #[error("invalid QoS level: {0}")]
    InvalidQos(u8),
}

/// Failure of a single payload conversion.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("unsupported data type, expected {expected}")]
    UnsupportedType { expected: &'static str },

    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}
