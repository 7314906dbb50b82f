//! The WebSocket frame protocol.
//!
//! Frames are JSON objects tagged by `type`. Outbound envelopes carry the
//! persisted message on CHAT frames and `null` data on JOIN/LEAVE.
//! Inbound SEND_MESSAGE frames deliberately have no sender field; the
//! sender is always the identity bound at the handshake.

use serde::{Deserialize, Serialize};

use crate::backend::messaging::store::Message;

/// Outbound envelope kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WsMessageType {
    Chat,
    Join,
    Leave,
}

/// Outbound envelope: `{"type": ..., "data": ...}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WsOutbound {
    #[serde(rename = "type")]
    pub kind: WsMessageType,
    pub data: Option<Message>,
}

impl WsOutbound {
    pub fn chat(message: Message) -> Self {
        Self {
            kind: WsMessageType::Chat,
            data: Some(message),
        }
    }

    pub fn join() -> Self {
        Self {
            kind: WsMessageType::Join,
            data: None,
        }
    }

    pub fn leave() -> Self {
        Self {
            kind: WsMessageType::Leave,
            data: None,
        }
    }
}

/// Inbound frames.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WsInbound {
    /// Persist a message and fan it out to the chat's topic.
    #[serde(rename_all = "camelCase")]
    SendMessage { chat_id: String, content: String },

    /// Announce arrival on the system topic.
    Join,

    /// Start receiving everything published to `topic`.
    Subscribe { topic: String },

    /// Stop receiving `topic`.
    Unsubscribe { topic: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_chat_envelope_wire_shape() {
        let message = Message {
            id: Uuid::new_v4(),
            chat_id: "room-1".to_string(),
            sender: "alice".to_string(),
            content: "Hello!".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(WsOutbound::chat(message)).unwrap();

        assert_eq!(json["type"], "CHAT");
        assert_eq!(json["data"]["chatId"], "room-1");
        assert_eq!(json["data"]["sender"], "alice");
        assert_eq!(json["data"]["content"], "Hello!");
        assert!(json["data"]["createdAt"].is_string());
    }

    #[test]
    fn test_join_envelope_has_null_data() {
        let json = serde_json::to_value(WsOutbound::join()).unwrap();
        assert_eq!(json["type"], "JOIN");
        assert!(json["data"].is_null());
    }

    #[test]
    fn test_parse_send_message_frame() {
        let frame: WsInbound =
            serde_json::from_str(r#"{"type":"SEND_MESSAGE","chatId":"room-1","content":"hi"}"#)
                .unwrap();
        match frame {
            WsInbound::SendMessage { chat_id, content } => {
                assert_eq!(chat_id, "room-1");
                assert_eq!(content, "hi");
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn test_parse_join_frame() {
        let frame: WsInbound = serde_json::from_str(r#"{"type":"JOIN"}"#).unwrap();
        assert!(matches!(frame, WsInbound::Join));
    }

    #[test]
    fn test_parse_subscribe_frame() {
        let frame: WsInbound =
            serde_json::from_str(r#"{"type":"SUBSCRIBE","topic":"chat.room-1"}"#).unwrap();
        match frame {
            WsInbound::Subscribe { topic } => assert_eq!(topic, "chat.room-1"),
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_frame_type_rejected() {
        let result = serde_json::from_str::<WsInbound>(r#"{"type":"TYPING"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_client_supplied_sender_is_not_part_of_the_frame() {
        // Extra fields are ignored; there is no way to smuggle a sender in.
        let frame: WsInbound = serde_json::from_str(
            r#"{"type":"SEND_MESSAGE","chatId":"room-1","content":"hi","sender":"mallory"}"#,
        )
        .unwrap();
        assert!(matches!(frame, WsInbound::SendMessage { .. }));
    }
}
