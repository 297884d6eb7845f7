//! UseCase: ルーム参加処理
//!
//! 表示名とルームを登録し、ルームの他の参加者に通知して名簿を再送します。
//! 既に参加済みの接続の再 join は、暗黙のルーム移動と表示名の更新として
//! 扱います（移動元のルームには退出通知と名簿を送ります）。
//! 最後に参加者本人へ参加ルームの履歴を送ります。

use std::sync::Arc;

use crate::domain::{ConnectionId, DisplayName, PresenceRegistry, RoomName, ServerEvent, Session};

use super::{HistoryService, RoomBroadcaster};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    registry: Arc<dyn PresenceRegistry>,
    broadcaster: Arc<RoomBroadcaster>,
    history: Arc<HistoryService>,
}

impl JoinRoomUseCase {
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

    /// ルーム参加を実行
    ///
    /// # Returns
    ///
    /// 登録されたセッション
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        display_name: DisplayName,
        room: RoomName,
    ) -> Session {
        let previous = self.registry.get(connection_id).await;
        self.registry
            .upsert(connection_id, display_name.clone(), room.clone())
            .await;
        tracing::info!(
            "Connection '{}' joined room '{}' as '{}'",
            connection_id,
            room,
            display_name
        );

        if let Some(previous) = previous
            && previous.room != room
        {
            self.broadcaster
                .to_room_except(
                    &previous.room,
                    connection_id,
                    &ServerEvent::left(&previous.display_name),
                )
                .await;
            self.broadcaster.user_list(&previous.room).await;
        }

        self.broadcaster
            .to_room_except(&room, connection_id, &ServerEvent::joined(&display_name))
            .await;
        self.broadcaster.user_list(&room).await;

        let history = self.history.recent_in_room(&room).await;
        self.broadcaster
            .to_connection(connection_id, &ServerEvent::History(history))
            .await;

        Session::new(connection_id, display_name, room)
    }
}
