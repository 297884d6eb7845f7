//! WebSocket frame DTOs.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.
//! Inbound payloads are coerced instead of rejected: a missing or falsy
//! field falls back to its default and a frame that is not an event object
//! is relayed as a chat message.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::{ClientCommand, DisplayName, MessageText, RoomName};

pub const EVENT_JOIN: &str = "join";
pub const EVENT_CHAT_MESSAGE: &str = "chat message";
pub const EVENT_TYPING: &str = "typing";
pub const EVENT_SWITCH_ROOM: &str = "switch room";

/// A chat message on the wire and on disk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageDto {
    pub id: uuid::Uuid,
    pub text: String,
    pub username: String,
    pub room: String,
    /// RFC 3339, UTC, millisecond precision
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypingDto {
    pub username: String,
    pub typing: bool,
}

/// Server -> client frame
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data")]
pub enum ServerFrame {
    #[serde(rename = "history")]
    History(Vec<MessageDto>),
    #[serde(rename = "chat message")]
    ChatMessage(MessageDto),
    #[serde(rename = "system message")]
    SystemMessage(String),
    #[serde(rename = "user list")]
    UserList(Vec<String>),
    #[serde(rename = "typing")]
    Typing(TypingDto),
}

/// Client -> server frame, before coercion
#[derive(Debug, Deserialize)]
struct ClientFrame {
    event: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("Unknown event '{0}'")]
    UnknownEvent(String),
}

/// Decode an inbound text frame into a normalized command.
pub fn decode_client_frame(text: &str) -> Result<ClientCommand, FrameError> {
    let frame = match serde_json::from_str::<ClientFrame>(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::debug!("Frame is not an event object ({}), relaying as chat text", e);
            return Ok(ClientCommand::SendMessage {
                text: MessageText::truncate(text),
            });
        }
    };

    match frame.event.as_str() {
        EVENT_JOIN => {
            let username = coerce_string(frame.data.get("username"));
            let room = coerce_string(frame.data.get("room"));
            Ok(ClientCommand::Join {
                display_name: DisplayName::normalize(username.as_deref()),
                room: RoomName::normalize(room.as_deref()),
            })
        }
        EVENT_CHAT_MESSAGE => {
            let text = match &frame.data {
                Value::String(_) => coerce_string(Some(&frame.data)),
                data => coerce_string(data.get("text")),
            };
            Ok(ClientCommand::SendMessage {
                text: MessageText::truncate(text.as_deref().unwrap_or_default()),
            })
        }
        EVENT_TYPING => Ok(ClientCommand::Typing {
            is_typing: is_truthy(&frame.data),
        }),
        EVENT_SWITCH_ROOM => Ok(ClientCommand::SwitchRoom {
            room: RoomName::normalize(coerce_string(Some(&frame.data)).as_deref()),
        }),
        other => Err(FrameError::UnknownEvent(other.to_string())),
    }
}

/// Loose truthiness used for inbound flags: null, false, 0, "" are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Stringify a truthy scalar; anything else yields `None` (use the default).
fn coerce_string(value: Option<&Value>) -> Option<String> {
    let value = value.filter(|v| is_truthy(v))?;
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
        _ => None,
    }
}
