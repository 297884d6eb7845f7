//! Outbound events pushed to connections.

use super::{entity::ChatMessage, value_object::DisplayName};

/// An event delivered from the server to one or more connections
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// Recent messages, oldest first
    History(Vec<ChatMessage>),
    ChatMessage(ChatMessage),
    /// Plain-text notice such as "Alice joined the room"
    SystemMessage(String),
    /// Roster of the recipient's room
    UserList(Vec<DisplayName>),
    Typing {
        display_name: DisplayName,
        is_typing: bool,
    },
}

impl ServerEvent {
    pub fn joined(display_name: &DisplayName) -> Self {
        Self::SystemMessage(format!("{} joined the room", display_name))
    }

    pub fn left(display_name: &DisplayName) -> Self {
        Self::SystemMessage(format!("{} left the room", display_name))
    }

    pub fn disconnected(display_name: &DisplayName) -> Self {
        Self::SystemMessage(format!("{} disconnected", display_name))
    }
}
