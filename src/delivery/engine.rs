//! Delivery engine
//!
//! This module contains the QoS state machine of the client, responsible for:
//! - publishing messages and tracking QoS 1/2 publishes until the broker
//!   finishes acknowledging them
//! - answering inbound publishes with the acknowledgment their QoS requires
//! - holding inbound QoS 2 publishes until released, then handing them to the
//!   application exactly once
//!
//! Message flows:
//!
//! ```text
//! QoS 0   Sender --Publish--> Receiver
//! QoS 1   Sender --Publish--> Receiver --PublishAck--> Sender
//! QoS 2   Sender --Publish--> Receiver --PublishReceived--> Sender
//!         Sender --PublishRelease--> Receiver --PublishComplete--> Sender
//! ```
//!
//! Concurrency and usage notes:
//! - Both the application (`publish`) and the transport (the five registered
//!   handlers) mutate the same tables. Every mutation happens inside one
//!   mutex; sends and delivery callbacks run after the lock is released, so a
//!   callback may call back into the engine.
//! - Converters convert outside the lock. Converter factories run under it
//!   and must not call into the engine.
//! - There is no retry loop. An entry stays in flight until its terminating
//!   acknowledgment arrives or the engine is dropped.
//! - Acknowledgments never depend on the delivery callback's result. The
//!   callback's boolean is only reported back through the handler's result.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, warn};

use super::inflight::{InboundInFlight, OutboundInFlight, PendingPublish};
use crate::config::{DeliverySettings, IdentifierScope};
use crate::converter::{ConverterKind, ConverterRegistry, PublishDataConverter};
use crate::identifier::{IdentifierSource, MessageIdentifierDispenser};
use crate::message::{MessageType, MqttMessage, PublishMessage, QoS};
use crate::transport::ConnectionHandler;
use crate::utils::error::DeliveryError;

/// Application hook receiving every payload whose delivery guarantee has been met.
pub type DeliveryCallback = Box<dyn Fn(&PublishMessage) -> bool + Send + Sync>;

type Handler = fn(&DeliveryEngine, &MqttMessage) -> bool;

struct EngineState {
    outbound: OutboundInFlight,
    inbound: InboundInFlight,
    converters: HashMap<ConverterKind, Arc<dyn PublishDataConverter>>,
    identifiers: Box<dyn IdentifierSource>,
}

impl EngineState {
    fn converter(
        &mut self,
        registry: &ConverterRegistry,
        kind: ConverterKind,
    ) -> Result<Arc<dyn PublishDataConverter>, DeliveryError> {
        if let Some(converter) = self.converters.get(&kind) {
            return Ok(Arc::clone(converter));
        }
        let converter = registry.create(kind)?;
        self.converters.insert(kind, Arc::clone(&converter));
        Ok(converter)
    }

    /// Draw identifiers until one is not already tracked as outbound. Scopes
    /// count independently, so two topics can produce the same number.
    fn allocate_identifier(&mut self, scope: &str) -> Result<u16, DeliveryError> {
        for _ in 0..=u16::MAX {
            let id = self.identifiers.next_identifier(scope);
            if !self.outbound.contains(id) {
                return Ok(id);
            }
        }
        Err(DeliveryError::IdentifiersExhausted)
    }
}

/// QoS 0/1/2 delivery for one connection. Shared as `Arc<DeliveryEngine>`
/// between the application and the handlers registered on the connection.
pub struct DeliveryEngine {
    connection: Arc<dyn ConnectionHandler>,
    deliver: DeliveryCallback,
    registry: ConverterRegistry,
    settings: DeliverySettings,
    state: Mutex<EngineState>,
}

impl DeliveryEngine {
    /// Engine with the built-in converters, default settings and a
    /// [`MessageIdentifierDispenser`]. Registers its handlers on `connection`.
    pub fn new<F>(connection: Arc<dyn ConnectionHandler>, deliver: F) -> Arc<Self>
    where
        F: Fn(&PublishMessage) -> bool + Send + Sync + 'static,
    {
        Self::with_settings(
            connection,
            deliver,
            ConverterRegistry::with_defaults(),
            &DeliverySettings::default(),
        )
    }

    /// Engine using `registry` for converters and `settings` for identifier
    /// scoping and log levels. Identifiers come from a fresh
    /// [`MessageIdentifierDispenser`].
    pub fn with_settings<F>(
        connection: Arc<dyn ConnectionHandler>,
        deliver: F,
        registry: ConverterRegistry,
        settings: &DeliverySettings,
    ) -> Arc<Self>
    where
        F: Fn(&PublishMessage) -> bool + Send + Sync + 'static,
    {
        Self::with_identifier_source(
            connection,
            deliver,
            registry,
            settings,
            Box::new(MessageIdentifierDispenser::new()),
        )
    }

    /// Fully explicit constructor. `identifiers` is consulted under the
    /// engine lock, once per publish plus once per identifier skipped because
    /// it is still in flight.
    ///
    /// Registers the five handshake handlers on `connection` before
    /// returning. The handlers hold a weak reference, so dropping the
    /// returned `Arc` stops the engine.
    pub fn with_identifier_source<F>(
        connection: Arc<dyn ConnectionHandler>,
        deliver: F,
        registry: ConverterRegistry,
        settings: &DeliverySettings,
        identifiers: Box<dyn IdentifierSource>,
    ) -> Arc<Self>
    where
        F: Fn(&PublishMessage) -> bool + Send + Sync + 'static,
    {
        let engine = Arc::new(Self {
            connection,
            deliver: Box::new(deliver),
            registry,
            settings: settings.clone(),
            state: Mutex::new(EngineState {
                outbound: OutboundInFlight::new(),
                inbound: InboundInFlight::new(),
                converters: HashMap::new(),
                identifiers,
            }),
        });
        Self::register_handlers(&engine);
        engine
    }

    fn register_handlers(engine: &Arc<Self>) {
        let handlers: [(MessageType, Handler); 5] = [
            (MessageType::PublishAck, Self::handle_publish_ack),
            (MessageType::Publish, Self::handle_publish),
            (MessageType::PublishComplete, Self::handle_publish_complete),
            (MessageType::PublishRelease, Self::handle_publish_release),
            (MessageType::PublishReceived, Self::handle_publish_received),
        ];

        for (message_type, handle) in handlers {
            // The connection owns the handlers; a strong reference here would
            // keep the engine alive forever.
            let engine_ref = Arc::downgrade(engine);
            engine.connection.register_for_message(
                message_type,
                Arc::new(move |msg: &MqttMessage| match engine_ref.upgrade() {
                    Some(engine) => handle(&engine, msg),
                    None => false,
                }),
            );
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn scope_key<'a>(&self, topic: &'a str) -> &'a str {
        match self.settings.identifier_scope {
            IdentifierScope::Topic => topic,
            IdentifierScope::Global => "",
        }
    }

    /// Publish `data` on `topic`, converted by the converter registered for
    /// `converter_kind`. Returns the message identifier assigned to the publish.
    ///
    /// QoS 1/2 publishes are recorded as in flight before they are sent. On
    /// error nothing has been recorded or sent.
    pub fn publish(
        &self,
        topic: &str,
        qos: QoS,
        converter_kind: ConverterKind,
        data: &dyn Any,
    ) -> Result<u16, DeliveryError> {
        self.publish_message(topic, qos, false, converter_kind, data)
    }

    /// Like [`publish`](Self::publish), with the retain flag set.
    pub fn publish_retained(
        &self,
        topic: &str,
        qos: QoS,
        converter_kind: ConverterKind,
        data: &dyn Any,
    ) -> Result<u16, DeliveryError> {
        self.publish_message(topic, qos, true, converter_kind, data)
    }

    fn publish_message(
        &self,
        topic: &str,
        qos: QoS,
        retain: bool,
        converter_kind: ConverterKind,
        data: &dyn Any,
    ) -> Result<u16, DeliveryError> {
        if topic.is_empty() {
            return Err(DeliveryError::EmptyTopic);
        }

        let converter = self
            .lock_state()
            .converter(&self.registry, converter_kind)?;
        // Conversion touches no engine state, so a converter may read from
        // the engine while it runs.
        let payload = converter
            .convert_to_bytes(data)
            .map_err(|source| DeliveryError::Conversion {
                kind: converter_kind,
                source,
            })?;

        let message = {
            let mut state = self.lock_state();
            let message_identifier = state.allocate_identifier(self.scope_key(topic))?;

            let message = PublishMessage::to_topic(topic)
                .with_qos(qos)
                .with_message_identifier(message_identifier)
                .retained(retain)
                .with_payload(payload);

            if qos.requires_handshake() {
                state.outbound.record(message.clone());
            }
            message
        };

        let message_identifier = message.message_identifier;
        debug!(topic, ?qos, message_identifier, retain, "publishing");
        self.connection.send_message(MqttMessage::Publish(message));

        Ok(message_identifier)
    }

    /// PublishAck: the broker has the QoS 1 message. Acks for identifiers we
    /// are not tracking are ignored.
    pub fn handle_publish_ack(&self, msg: &MqttMessage) -> bool {
        let MqttMessage::PublishAck { message_identifier } = *msg else {
            return self.misrouted(MessageType::PublishAck, msg);
        };

        if self.lock_state().outbound.complete(message_identifier).is_some() {
            debug!(message_identifier, "publish acknowledged");
        } else {
            debug!(message_identifier, "ack for untracked publish ignored");
        }
        true
    }

    /// PublishReceived: step two of an outbound QoS 2 handshake. The publish
    /// stays tracked until PublishComplete.
    pub fn handle_publish_received(&self, msg: &MqttMessage) -> bool {
        let MqttMessage::PublishReceived { message_identifier } = *msg else {
            return self.misrouted(MessageType::PublishReceived, msg);
        };

        let pending = self.lock_state().outbound.contains(message_identifier);
        if pending {
            debug!(message_identifier, "publish received by broker, releasing");
            self.connection
                .send_message(MqttMessage::PublishRelease { message_identifier });
        } else {
            debug!(message_identifier, "received for untracked publish ignored");
        }
        true
    }

    /// PublishComplete: the outbound QoS 2 handshake is finished. Reports
    /// whether the identifier was being tracked.
    pub fn handle_publish_complete(&self, msg: &MqttMessage) -> bool {
        let MqttMessage::PublishComplete { message_identifier } = *msg else {
            return self.misrouted(MessageType::PublishComplete, msg);
        };

        let completed = self.lock_state().outbound.complete(message_identifier);
        match completed {
            Some(PendingPublish { message, .. }) => {
                debug!(message_identifier, topic = %message.topic, "publish complete");
                true
            }
            None => {
                debug!(message_identifier, "complete for untracked publish");
                false
            }
        }
    }

    /// Publish from the broker. QoS 0 and 1 are delivered at once; QoS 2 is
    /// stored until the broker releases it.
    pub fn handle_publish(&self, msg: &MqttMessage) -> bool {
        let MqttMessage::Publish(publish) = msg else {
            return self.misrouted(MessageType::Publish, msg);
        };
        let message_identifier = publish.message_identifier;

        match publish.qos {
            QoS::AtMostOnce => (self.deliver)(publish),
            QoS::AtLeastOnce => {
                let delivered = (self.deliver)(publish);
                self.connection
                    .send_message(MqttMessage::PublishAck { message_identifier });
                delivered
            }
            QoS::ExactlyOnce => {
                let stored = self.lock_state().inbound.store_once(publish.clone());
                if stored {
                    debug!(message_identifier, topic = %publish.topic, "holding publish until release");
                } else {
                    debug!(message_identifier, "duplicate publish, keeping first copy");
                }
                self.connection
                    .send_message(MqttMessage::PublishReceived { message_identifier });
                true
            }
        }
    }

    /// PublishRelease: hand the stored QoS 2 publish to the application and
    /// complete the handshake. A release for an identifier never received
    /// sends nothing and reports `false`.
    pub fn handle_publish_release(&self, msg: &MqttMessage) -> bool {
        let MqttMessage::PublishRelease { message_identifier } = *msg else {
            return self.misrouted(MessageType::PublishRelease, msg);
        };

        let released = self.lock_state().inbound.release(message_identifier);
        match released {
            Some(publish) => {
                let delivered = (self.deliver)(&publish);
                self.connection
                    .send_message(MqttMessage::PublishComplete { message_identifier });
                delivered
            }
            None => {
                if self.settings.warn_on_unmatched_release {
                    warn!(message_identifier, "release for a publish that was never received");
                } else {
                    debug!(message_identifier, "release for a publish that was never received");
                }
                false
            }
        }
    }

    fn misrouted(&self, expected: MessageType, msg: &MqttMessage) -> bool {
        error!(
            ?expected,
            actual = ?msg.message_type(),
            "message routed to the wrong handler"
        );
        false
    }

    /// Identifiers of outbound publishes still awaiting their final acknowledgment.
    pub fn pending_publishes(&self) -> Vec<u16> {
        self.lock_state().outbound.identifiers()
    }

    /// Whether `message_identifier` is an outbound publish awaiting PublishAck
    /// or PublishComplete.
    pub fn is_publish_pending(&self, message_identifier: u16) -> bool {
        self.lock_state().outbound.contains(message_identifier)
    }

    /// The tracked outbound publish for `message_identifier`, if any.
    pub fn pending_publish(&self, message_identifier: u16) -> Option<PendingPublish> {
        self.lock_state().outbound.get(message_identifier).cloned()
    }

    /// Identifiers of inbound QoS 2 publishes awaiting PublishRelease.
    pub fn pending_receipts(&self) -> Vec<u16> {
        self.lock_state().inbound.identifiers()
    }

    /// Whether an inbound QoS 2 publish with `message_identifier` is held
    /// until its PublishRelease.
    pub fn is_receipt_pending(&self, message_identifier: u16) -> bool {
        self.lock_state().inbound.contains(message_identifier)
    }

    /// Number of converter kinds built so far. Each kind is built at most
    /// once per engine.
    pub fn cached_converter_count(&self) -> usize {
        self.lock_state().converters.len()
    }
}

impl std::fmt::Debug for DeliveryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock_state();
        f.debug_struct("DeliveryEngine")
            .field("outbound", &state.outbound.identifiers())
            .field("inbound", &state.inbound.identifiers())
            .field("converters", &state.converters.len())
            .field("settings", &self.settings)
            .finish()
    }
}
