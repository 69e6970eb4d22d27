use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{
    ConverterKind, ConverterRegistry, JsonConverter, PassThroughConverter, PublishDataConverter,
    Utf8StringConverter,
};
use crate::utils::error::{ConversionError, DeliveryError};

#[test]
fn test_pass_through_accepts_owned_and_static_bytes() {
    let converter = PassThroughConverter;
    assert_eq!(converter.convert_to_bytes(&vec![1u8, 2, 3]).unwrap(), vec![1, 2, 3]);
    let data: &'static [u8] = b"abc";
    assert_eq!(converter.convert_to_bytes(&data).unwrap(), b"abc");
}

#[test]
fn test_pass_through_rejects_text() {
    let result = PassThroughConverter.convert_to_bytes(&"text".to_string());
    assert!(matches!(
        result,
        Err(ConversionError::UnsupportedType { .. })
    ));
}

#[test]
fn test_utf8_string_converter() {
    let converter = Utf8StringConverter;
    assert_eq!(converter.convert_to_bytes(&"héllo".to_string()).unwrap(), "héllo".as_bytes());
    assert_eq!(converter.convert_to_bytes(&"static").unwrap(), b"static");
    assert!(converter.convert_to_bytes(&42u32).is_err());
}

#[test]
fn test_json_converter() {
    let value = serde_json::json!({ "temp": 25 });
    let bytes = JsonConverter.convert_to_bytes(&value).unwrap();
    assert_eq!(bytes, br#"{"temp":25}"#);
    assert!(JsonConverter.convert_to_bytes(&"not json").is_err());
}

#[test]
fn test_registry_defaults() {
    let registry = ConverterRegistry::with_defaults();
    assert!(registry.create(ConverterKind::PASS_THROUGH).is_ok());
    assert!(registry.create(ConverterKind::UTF8_STRING).is_ok());
    assert!(registry.create(ConverterKind::JSON).is_ok());
    assert!(registry.create(ConverterKind::new("protobuf")).is_err());
}

#[test]
fn test_registry_unknown_kind() {
    let registry = ConverterRegistry::new();
    let err = registry.create(ConverterKind::JSON).err().unwrap();
    assert!(matches!(err, DeliveryError::UnknownConverter(kind) if kind == ConverterKind::JSON));
}

#[test]
fn test_registry_factory_failure() {
    let mut registry = ConverterRegistry::new();
    let kind = ConverterKind::new("broken");
    registry.register_factory(kind, || Err("no default construction".to_string()));

    match registry.create(kind) {
        Err(DeliveryError::ConverterConstruction { kind: k, reason }) => {
            assert_eq!(k, kind);
            assert_eq!(reason, "no default construction");
        }
        other => panic!("Expected construction failure, got {:?}", other.err()),
    }
}

#[test]
fn test_registry_runs_factory_on_every_create() {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = built.clone();
    let mut registry = ConverterRegistry::new();
    registry.register_factory(ConverterKind::PASS_THROUGH, move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(PassThroughConverter) as Arc<dyn PublishDataConverter>)
    });

    registry.create(ConverterKind::PASS_THROUGH).unwrap();
    registry.create(ConverterKind::PASS_THROUGH).unwrap();
    assert_eq!(built.load(Ordering::SeqCst), 2);
}

#[test]
fn test_registry_debug_lists_kinds() {
    let registry = ConverterRegistry::with_defaults();
    let text = format!("{registry:?}");
    assert!(text.contains("json"));
    assert!(text.contains("pass-through"));
}
