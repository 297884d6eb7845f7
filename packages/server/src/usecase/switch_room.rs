//! UseCase: ルーム移動処理
//!
//! 1. Registry のルームを更新（変更前のルームを取得）
//! 2. 移動元に退出通知、移動先に参加通知
//! 3. 両ルームの名簿を再送
//! 4. 移動した本人に移動先の履歴を送信
//!
//! セッションの無い接続の移動は、既定の表示名でのセッション作成として扱います。
//! 同じルームへの移動は通知を出さず、履歴の再送のみ行います。

use std::sync::Arc;

use crate::domain::{ConnectionId, PresenceRegistry, RegistryError, RoomName, ServerEvent};

use super::{HistoryService, RoomBroadcaster};

/// ルーム移動の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomTransition {
    /// 移動元（セッションが無かった場合は `None`）
    pub previous: Option<RoomName>,
    pub current: RoomName,
}

/// ルーム移動のユースケース
pub struct SwitchRoomUseCase {
    registry: Arc<dyn PresenceRegistry>,
    broadcaster: Arc<RoomBroadcaster>,
    history: Arc<HistoryService>,
}

impl SwitchRoomUseCase {
    pub fn new(
        registry: Arc<dyn PresenceRegistry>,
        broadcaster: Arc<RoomBroadcaster>,
        history: Arc<HistoryService>,
    ) -> Self {
        Self {
            registry,
            broadcaster,
            history,
        }
    }

    pub async fn execute(&self, connection_id: ConnectionId, new_room: RoomName) -> RoomTransition {
        let previous = match self.registry.update_room(connection_id, new_room.clone()).await {
            Ok(old_room) => Some(old_room),
            Err(RegistryError::UnknownConnection(_)) => {
                tracing::debug!(
                    "Connection '{}' switched room before joining, creating a default session",
                    connection_id
                );
                self.registry
                    .upsert(connection_id, Default::default(), new_room.clone())
                    .await;
                None
            }
        };

        if previous.as_ref() != Some(&new_room) {
            let display_name = self
                .registry
                .get(connection_id)
                .await
                .map(|s| s.display_name)
                .unwrap_or_default();
            tracing::info!(
                "Connection '{}' ({}) switched room {} -> '{}'",
                connection_id,
                display_name,
                previous
                    .as_ref()
                    .map(|r| format!("'{r}'"))
                    .unwrap_or_else(|| "(none)".to_string()),
                new_room
            );

            if let Some(old_room) = &previous {
                self.broadcaster
                    .to_room_except(old_room, connection_id, &ServerEvent::left(&display_name))
                    .await;
            }
            self.broadcaster
                .to_room_except(&new_room, connection_id, &ServerEvent::joined(&display_name))
                .await;
            if let Some(old_room) = &previous {
                self.broadcaster.user_list(old_room).await;
            }
            self.broadcaster.user_list(&new_room).await;
        }

        let history = self.history.recent_in_room(&new_room).await;
        self.broadcaster
            .to_connection(connection_id, &ServerEvent::History(history))
            .await;

        RoomTransition {
            previous,
            current: new_room,
        }
    }
}
