//! UseCase: 切断処理
//!
//! Registry からの削除が線形化点です。削除後の配信対象には含まれません。
//! セッションの無い接続の切断は何もしません（冪等）。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PresenceRegistry, ServerEvent, Session};

use super::RoomBroadcaster;

/// 切断のユースケース
pub struct DisconnectUseCase {
    registry: Arc<dyn PresenceRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    broadcaster: Arc<RoomBroadcaster>,
}

impl DisconnectUseCase {
    pub fn new(
        registry: Arc<dyn PresenceRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        broadcaster: Arc<RoomBroadcaster>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            broadcaster,
        }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// 削除されたセッション（無ければ `None`）
    pub async fn execute(&self, connection_id: ConnectionId) -> Option<Session> {
        let removed = self.registry.remove(connection_id).await;
        self.message_pusher.unregister_client(connection_id).await;

        let session = removed?;
        tracing::info!(
            "Connection '{}' ({}) left room '{}'",
            connection_id,
            session.display_name,
            session.room
        );
        self.broadcaster
            .to_room_except(
                &session.room,
                connection_id,
                &ServerEvent::disconnected(&session.display_name),
            )
            .await;
        self.broadcaster.user_list(&session.room).await;

        Some(session)
    }
}
