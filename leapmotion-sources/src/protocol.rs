//! Wire codec for the tracking service's JSON protocol

use crate::error::{Result, SourceError};
use crate::frame::{DeviceEvent, Frame, ServiceVersion};
use serde::{Deserialize, Serialize};
use tokio_tungstenite::tungstenite::Message;

/// Configuration messages sent right after the upgrade, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum HandshakeMessage {
    #[serde(rename = "enableGestures")]
    EnableGestures(bool),
    #[serde(rename = "backgroundMessage")]
    Background(bool),
}

impl HandshakeMessage {
    pub fn sequence(enable_gestures: bool, background: bool) -> [HandshakeMessage; 2] {
        [
            HandshakeMessage::EnableGestures(enable_gestures),
            HandshakeMessage::Background(background),
        ]
    }

    pub fn to_message(self) -> Result<Message> {
        Ok(Message::Text(serde_json::to_string(&self)?))
    }
}

/// A decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    Frame(Box<Frame>),
    DeviceEvent(DeviceEvent),
    ServiceVersion(ServiceVersion),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope {
    Event { event: EventBody },
    Version(ServiceVersion),
    Frame(Box<Frame>),
}

#[derive(Deserialize)]
struct EventBody {
    #[serde(rename = "type")]
    kind: String,
    state: DeviceEvent,
}

/// Decode one JSON payload.
pub fn decode(payload: &[u8]) -> Result<InboundMessage> {
    let envelope: Envelope = serde_json::from_slice(payload).map_err(|e| {
        SourceError::SerializationError(format!("Undecodable tracking message: {}", e))
    })?;

    match envelope {
        Envelope::Frame(frame) => Ok(InboundMessage::Frame(frame)),
        Envelope::Version(version) => Ok(InboundMessage::ServiceVersion(version)),
        Envelope::Event { event } if event.kind == "deviceEvent" => {
            Ok(InboundMessage::DeviceEvent(event.state))
        }
        Envelope::Event { event } => Err(SourceError::UnsupportedMessage(format!(
            "Unknown event type '{}'",
            event.kind
        ))),
    }
}

/// Decode a WebSocket message carrying a JSON payload.
///
/// Returns `Ok(None)` for control messages that carry no tracking data.
pub fn decode_message(msg: &Message) -> Result<Option<InboundMessage>> {
    match msg {
        Message::Text(text) => decode(text.as_bytes()).map(Some),
        Message::Binary(data) => decode(data).map(Some),
        Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => Ok(None),
        Message::Close(_) => Err(SourceError::UnsupportedMessage(
            "Close frames carry no tracking data".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_sequence_encoding() {
        let encoded: Vec<String> = HandshakeMessage::sequence(true, false)
            .iter()
            .map(|m| serde_json::to_string(m).unwrap())
            .collect();
        assert_eq!(encoded, vec![r#"{"enableGestures":true}"#, r#"{"backgroundMessage":false}"#]);

        let msg = HandshakeMessage::Background(true).to_message().unwrap();
        assert_eq!(msg, Message::Text(r#"{"backgroundMessage":true}"#.to_string()));
    }

    #[test]
    fn test_decode_frame() {
        let msg = decode(br#"{"id": 5, "timestamp": 100, "hands": []}"#).unwrap();
        match msg {
            InboundMessage::Frame(frame) => {
                assert_eq!(frame.id, 5);
                assert_eq!(frame.timestamp, 100);
            }
            other => panic!("expected frame, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_service_version() {
        let msg = decode(br#"{"serviceVersion": "2.3.1+33747", "version": 6}"#).unwrap();
        assert_eq!(
            msg,
            InboundMessage::ServiceVersion(ServiceVersion {
                service_version: "2.3.1+33747".to_string(),
                version: 6,
            })
        );
    }

    #[test]
    fn test_decode_device_event() {
        let payload = br#"{"event": {"type": "deviceEvent", "state": {"attached": true, "id": "LP1234", "streaming": false, "type": "peripheral"}}}"#;
        let msg = decode(payload).unwrap();
        assert_eq!(
            msg,
            InboundMessage::DeviceEvent(DeviceEvent {
                id: "LP1234".to_string(),
                attached: true,
                streaming: false,
                kind: "peripheral".to_string(),
            })
        );

        let unknown = decode(br#"{"event": {"type": "other", "state": {}}}"#).unwrap_err();
        assert!(matches!(unknown, SourceError::UnsupportedMessage(_)));
    }

    #[test]
    fn test_decode_rejects_malformed_payloads() {
        let payloads: [&[u8]; 4] = [
            b"{not json",
            br#"{"hands": []}"#,
            br#"[1, 2, 3]"#,
            br#"{"id": "x", "timestamp": 1}"#,
        ];
        for payload in payloads {
            let err = decode(payload).unwrap_err();
            assert!(matches!(err, SourceError::SerializationError(_)), "payload {:?}", payload);
        }
    }

    #[test]
    fn test_decode_message_variants() {
        let text = Message::Text(r#"{"id": 1, "timestamp": 2}"#.to_string());
        assert!(matches!(decode_message(&text), Ok(Some(InboundMessage::Frame(_)))));

        let binary = Message::Binary(br#"{"id": 1, "timestamp": 2}"#.to_vec());
        assert!(matches!(decode_message(&binary), Ok(Some(InboundMessage::Frame(_)))));

        assert!(matches!(decode_message(&Message::Ping(vec![1])), Ok(None)));
        assert!(decode_message(&Message::Close(None)).is_err());
    }
}
