use std::collections::HashMap;
use std::sync::Arc;

use super::{
    ConverterKind, JsonConverter, PassThroughConverter, PublishDataConverter, Utf8StringConverter,
};
use crate::utils::error::DeliveryError;

/// Builds a converter instance. Returning `Err` marks the construction as
/// failed; the message is carried into [`DeliveryError::ConverterConstruction`].
pub type ConverterFactory =
    Box<dyn Fn() -> Result<Arc<dyn PublishDataConverter>, String> + Send + Sync>;

/// Explicit mapping from converter kind to the factory that builds it.
///
/// The registry itself never caches: every call to [`create`](Self::create)
/// runs the factory. Caching is the delivery engine's job.
#[derive(Default)]
pub struct ConverterRegistry {
    factories: HashMap<ConverterKind, ConverterFactory>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with the built-in pass-through, UTF-8 and JSON converters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_instance(ConverterKind::PASS_THROUGH, Arc::new(PassThroughConverter));
        registry.register_instance(ConverterKind::UTF8_STRING, Arc::new(Utf8StringConverter));
        registry.register_instance(ConverterKind::JSON, Arc::new(JsonConverter));
        registry
    }

    /// Register (or replace) the factory for `kind`.
    ///
    /// The delivery engine runs the factory while holding its state lock, the
    /// first time a publish asks for `kind`. A factory must not call into that
    /// engine or it deadlocks. The converters it builds are not restricted:
    /// `convert_to_bytes` runs after the lock is released.
    pub fn register_factory<F>(&mut self, kind: ConverterKind, factory: F)
    where
        F: Fn() -> Result<Arc<dyn PublishDataConverter>, String> + Send + Sync + 'static,
    {
        self.factories.insert(kind, Box::new(factory));
    }

    /// Register a pre-built instance; every construction hands out a clone of it.
    pub fn register_instance(&mut self, kind: ConverterKind, converter: Arc<dyn PublishDataConverter>) {
        self.register_factory(kind, move || Ok(Arc::clone(&converter)));
    }

    pub fn create(&self, kind: ConverterKind) -> Result<Arc<dyn PublishDataConverter>, DeliveryError> {
        let factory = self
            .factories
            .get(&kind)
            .ok_or(DeliveryError::UnknownConverter(kind))?;
        factory().map_err(|reason| DeliveryError::ConverterConstruction { kind, reason })
    }
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.factories.keys().map(|k| k.name()).collect();
        kinds.sort_unstable();
        f.debug_struct("ConverterRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}
