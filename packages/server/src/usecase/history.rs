//! History Delivery: the recent-message window served on (re)join.

use std::sync::Arc;

use crate::domain::{ChatMessage, MessageStore, RoomName};

/// Number of messages served when none is configured
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

pub struct HistoryService {
    store: Arc<dyn MessageStore>,
    limit: usize,
}

impl HistoryService {
    pub fn new(store: Arc<dyn MessageStore>, limit: usize) -> Self {
        Self { store, limit }
    }

    /// Last `limit` messages across all rooms, oldest first.
    ///
    /// A read failure is logged and yields an empty window.
    pub async fn recent(&self) -> Vec<ChatMessage> {
        match self.store.recent(self.limit).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::error!("Failed to read recent history: {}", e);
                Vec::new()
            }
        }
    }

    /// Last `limit` messages of `room`, oldest first.
    pub async fn recent_in_room(&self, room: &RoomName) -> Vec<ChatMessage> {
        let all = match self.store.all().await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::error!("Failed to read history of room '{}': {}", room, e);
                return Vec::new();
            }
        };

        let mut in_room: Vec<ChatMessage> = all.into_iter().filter(|m| &m.room == room).collect();
        let start = in_room.len().saturating_sub(self.limit);
        in_room.split_off(start)
    }
}
