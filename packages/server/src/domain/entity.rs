//! Domain entities.

use chrono::{DateTime, Utc};

use super::value_object::{ConnectionId, DisplayName, MessageId, MessageText, RoomName};

/// The (display name, room) state of one live connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub connection_id: ConnectionId,
    pub display_name: DisplayName,
    pub room: RoomName,
}

impl Session {
    pub fn new(connection_id: ConnectionId, display_name: DisplayName, room: RoomName) -> Self {
        Self {
            connection_id,
            display_name,
            room,
        }
    }
}

/// An immutable chat message as persisted in the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub text: MessageText,
    pub display_name: DisplayName,
    pub room: RoomName,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(
        text: MessageText,
        display_name: DisplayName,
        room: RoomName,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MessageId::generate(),
            text,
            display_name,
            room,
            timestamp,
        }
    }
}

/// Point-in-time roster of one active room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomOccupancy {
    pub room: RoomName,
    pub display_names: Vec<DisplayName>,
}
