//! Inbound commands of a connection, already normalized.

use super::value_object::{DisplayName, MessageText, RoomName};

/// A client request handled by the session coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    Join {
        display_name: DisplayName,
        room: RoomName,
    },
    SendMessage {
        text: MessageText,
    },
    Typing {
        is_typing: bool,
    },
    SwitchRoom {
        room: RoomName,
    },
}
