//! Publish data converters.
//!
//! A converter turns application data into the payload bytes of a publish.
//! Converters are selected by [`ConverterKind`] and built through the
//! [`ConverterRegistry`]; the delivery engine keeps the first instance built
//! for each kind and reuses it for every later publish.

pub mod registry;

use std::any::Any;
use std::fmt;

use crate::utils::error::ConversionError;

pub use registry::{ConverterFactory, ConverterRegistry};

/// Identifies a registered converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConverterKind(&'static str);

impl ConverterKind {
    pub const PASS_THROUGH: ConverterKind = ConverterKind::new("pass-through");
    pub const UTF8_STRING: ConverterKind = ConverterKind::new("utf8-string");
    pub const JSON: ConverterKind = ConverterKind::new("json");

    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ConverterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Turns application data into publish payload bytes.
///
/// `data` is type-erased; a converter downcasts to the types it supports and
/// reports [`ConversionError::UnsupportedType`] for anything else.
pub trait PublishDataConverter: Send + Sync {
    fn convert_to_bytes(&self, data: &dyn Any) -> Result<Vec<u8>, ConversionError>;
}

/// Raw bytes in, the same bytes out.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThroughConverter;

impl PublishDataConverter for PassThroughConverter {
    fn convert_to_bytes(&self, data: &dyn Any) -> Result<Vec<u8>, ConversionError> {
        if let Some(bytes) = data.downcast_ref::<Vec<u8>>() {
            return Ok(bytes.clone());
        }
        if let Some(bytes) = data.downcast_ref::<&'static [u8]>() {
            return Ok(bytes.to_vec());
        }
        Err(ConversionError::UnsupportedType {
            expected: "Vec<u8> or &'static [u8]",
        })
    }
}

/// Text encoded as UTF-8.
#[derive(Debug, Default, Clone, Copy)]
pub struct Utf8StringConverter;

impl PublishDataConverter for Utf8StringConverter {
    fn convert_to_bytes(&self, data: &dyn Any) -> Result<Vec<u8>, ConversionError> {
        if let Some(text) = data.downcast_ref::<String>() {
            return Ok(text.as_bytes().to_vec());
        }
        if let Some(text) = data.downcast_ref::<&'static str>() {
            return Ok(text.as_bytes().to_vec());
        }
        Err(ConversionError::UnsupportedType {
            expected: "String or &'static str",
        })
    }
}

/// A `serde_json::Value` serialised compactly.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonConverter;

impl PublishDataConverter for JsonConverter {
    fn convert_to_bytes(&self, data: &dyn Any) -> Result<Vec<u8>, ConversionError> {
        match data.downcast_ref::<serde_json::Value>() {
            Some(value) => Ok(serde_json::to_vec(value)?),
            None => Err(ConversionError::UnsupportedType {
                expected: "serde_json::Value",
            }),
        }
    }
}

#[cfg(test)]
mod tests;
