use super::{MessageType, MqttMessage, PublishMessage, QoS};
use crate::utils::error::DeliveryError;

#[test]
fn test_qos_values() {
    assert_eq!(u8::from(QoS::AtMostOnce), 0);
    assert_eq!(u8::from(QoS::AtLeastOnce), 1);
    assert_eq!(u8::from(QoS::ExactlyOnce), 2);
}

#[test]
fn test_qos_rejects_reserved_level() {
    assert!(matches!(QoS::try_from(3), Err(DeliveryError::InvalidQos(3))));
    assert_eq!(QoS::try_from(2).unwrap(), QoS::ExactlyOnce);
}

#[test]
fn test_qos_requires_handshake() {
    assert!(!QoS::AtMostOnce.requires_handshake());
    assert!(QoS::AtLeastOnce.requires_handshake());
    assert!(QoS::ExactlyOnce.requires_handshake());
}

#[test]
fn test_publish_message_builder() {
    let msg = PublishMessage::to_topic("sensors/temp")
        .with_qos(QoS::ExactlyOnce)
        .with_message_identifier(42)
        .retained(true)
        .with_payload(b"23.5".to_vec());

    assert_eq!(msg.topic, "sensors/temp");
    assert_eq!(msg.qos, QoS::ExactlyOnce);
    assert_eq!(msg.message_identifier, 42);
    assert!(msg.retain);
    assert_eq!(msg.payload, b"23.5");
}

#[test]
fn test_message_type() {
    let publish = MqttMessage::Publish(
        PublishMessage::to_topic("t").with_message_identifier(9),
    );
    assert_eq!(publish.message_type(), MessageType::Publish);

    let rel = MqttMessage::PublishRelease {
        message_identifier: 7,
    };
    assert_eq!(rel.message_type(), MessageType::PublishRelease);
}

#[test]
fn test_message_type_index_covers_all_slots() {
    for (slot, message_type) in MessageType::ALL.iter().enumerate() {
        assert_eq!(message_type.index(), slot);
    }
}

#[test]
fn test_message_json_is_tagged() {
    let ack = MqttMessage::PublishAck {
        message_identifier: 3,
    };
    let json = serde_json::to_value(&ack).unwrap();
    assert_eq!(json["type"], "puback");
    assert_eq!(json["message_identifier"], 3);

    let publish: MqttMessage = serde_json::from_str(
        r#"{"type":"publish","topic":"t","qos":2,"message_identifier":5,"retain":false,"payload":[104,105]}"#,
    )
    .unwrap();
    match publish {
        MqttMessage::Publish(p) => {
            assert_eq!(p.qos, QoS::ExactlyOnce);
            assert_eq!(p.payload, b"hi");
        }
        other => panic!("Expected a publish message, got {other:?}"),
    }
}

#[test]
fn test_message_json_rejects_invalid_qos() {
    let result = serde_json::from_str::<MqttMessage>(
        r#"{"type":"publish","topic":"t","qos":3,"message_identifier":5,"retain":false,"payload":[]}"#,
    );
    let err = result.unwrap_err();
    assert!(err.to_string().contains("invalid QoS level: 3"));
}
