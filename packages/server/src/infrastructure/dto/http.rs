//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::MessageDto;

/// An active room and who is in it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomSummaryDto {
    pub name: String,
    pub users: Vec<String>,
}

/// A room with its roster and recent history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomDetailDto {
    pub name: String,
    pub users: Vec<String>,
    pub messages: Vec<MessageDto>,
}
