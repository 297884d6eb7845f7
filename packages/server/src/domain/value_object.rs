//! Value objects of the chat relay.
//!
//! Client-supplied labels are never rejected: they are trimmed, capped and
//! replaced by a default when nothing is left.

use std::fmt;

use uuid::Uuid;

/// Maximum length of a display name, in characters
pub const DISPLAY_NAME_MAX_CHARS: usize = 30;
/// Maximum length of a room name, in characters
pub const ROOM_NAME_MAX_CHARS: usize = 30;
/// Maximum length of a message text, in characters
pub const MESSAGE_TEXT_MAX_CHARS: usize = 1000;

pub const DEFAULT_DISPLAY_NAME: &str = "Anonymous";
pub const DEFAULT_ROOM_NAME: &str = "main";

/// Cut `value` down to at most `max_chars` characters without splitting a char.
fn truncate_chars(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &value[..byte_index],
        None => value,
    }
}

/// Trim, cap and fall back to `default` when the result is empty.
fn normalize_label(raw: &str, max_chars: usize, default: &str) -> String {
    let capped = truncate_chars(raw.trim(), max_chars);
    if capped.is_empty() {
        default.to_string()
    } else {
        capped.to_string()
    }
}

/// Opaque handle of one live connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unauthenticated label attached to a connection (1..=30 chars)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayName(String);

impl DisplayName {
    /// Normalize a client-supplied name. `None` yields the default name.
    pub fn normalize(raw: Option<&str>) -> Self {
        Self(normalize_label(
            raw.unwrap_or_default(),
            DISPLAY_NAME_MAX_CHARS,
            DEFAULT_DISPLAY_NAME,
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for DisplayName {
    fn default() -> Self {
        Self(DEFAULT_DISPLAY_NAME.to_string())
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a room (1..=30 chars). Rooms exist only through references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomName(String);

impl RoomName {
    /// Normalize a client-supplied room name. `None` yields the default room.
    pub fn normalize(raw: Option<&str>) -> Self {
        Self(normalize_label(
            raw.unwrap_or_default(),
            ROOM_NAME_MAX_CHARS,
            DEFAULT_ROOM_NAME,
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for RoomName {
    fn default() -> Self {
        Self(DEFAULT_ROOM_NAME.to_string())
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of a chat message, capped at 1000 chars.
///
/// Not trimmed: whitespace-only text is a valid message at this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    pub fn truncate(raw: &str) -> Self {
        Self(truncate_chars(raw, MESSAGE_TEXT_MAX_CHARS).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Unique identifier of a persisted message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}
