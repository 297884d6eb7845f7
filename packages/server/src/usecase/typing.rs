//! UseCase: 入力中表示の通知
//!
//! 送信者を除くルームの参加者に通知します。永続化もレート制限もしません。

use std::sync::Arc;

use crate::domain::{ConnectionId, PresenceRegistry, ServerEvent, Session};

use super::RoomBroadcaster;

/// 入力中通知のユースケース
pub struct TypingUseCase {
    registry: Arc<dyn PresenceRegistry>,
    broadcaster: Arc<RoomBroadcaster>,
}

impl TypingUseCase {
    pub fn new(registry: Arc<dyn PresenceRegistry>, broadcaster: Arc<RoomBroadcaster>) -> Self {
        Self {
            registry,
            broadcaster,
        }
    }

    pub async fn execute(&self, connection_id: ConnectionId, is_typing: bool) {
        let Session {
            display_name, room, ..
        } = self.registry.get(connection_id).await.unwrap_or_else(|| {
            Session::new(connection_id, Default::default(), Default::default())
        });

        self.broadcaster
            .to_room_except(
                &room,
                connection_id,
                &ServerEvent::Typing {
                    display_name,
                    is_typing,
                },
            )
            .await;
    }
}
