//! UseCase: ルーム詳細取得

use std::sync::Arc;

use crate::domain::{ChatMessage, DisplayName, PresenceRegistry, RoomName};

use super::{HistoryService, error::GetRoomDetailError};

/// ルームの名簿と最新履歴
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDetail {
    pub room: RoomName,
    pub display_names: Vec<DisplayName>,
    pub messages: Vec<ChatMessage>,
}

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    registry: Arc<dyn PresenceRegistry>,
    history: Arc<HistoryService>,
}

impl GetRoomDetailUseCase {
    pub fn new(registry: Arc<dyn PresenceRegistry>, history: Arc<HistoryService>) -> Self {
        Self { registry, history }
    }

    /// ルーム詳細を取得
    ///
    /// 参加者もメッセージも無いルームは存在しないものとして扱います。
    pub async fn execute(&self, room: RoomName) -> Result<RoomDetail, GetRoomDetailError> {
        let display_names = self.registry.list_display_names(&room).await;
        let messages = self.history.recent_in_room(&room).await;

        if display_names.is_empty() && messages.is_empty() {
            return Err(GetRoomDetailError::RoomNotFound(room.into_string()));
        }

        Ok(RoomDetail {
            room,
            display_names,
            messages,
        })
    }
}
