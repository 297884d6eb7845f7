//! UseCase: 接続開始処理
//!
//! 接続の送信チャンネルを登録し、全ルーム横断の最新履歴を送ります。
//! この時点ではセッションは作られません（Unjoined 状態）。クライアントは
//! 自分のルームでフィルタし、join 時にルーム別の履歴を改めて受け取ります。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel, ServerEvent};

use super::{HistoryService, RoomBroadcaster};

/// 接続開始のユースケース
pub struct ConnectUseCase {
    message_pusher: Arc<dyn MessagePusher>,
    broadcaster: Arc<RoomBroadcaster>,
    history: Arc<HistoryService>,
}

impl ConnectUseCase {
    pub fn new(
        message_pusher: Arc<dyn MessagePusher>,
        broadcaster: Arc<RoomBroadcaster>,
        history: Arc<HistoryService>,
    ) -> Self {
        Self {
            message_pusher,
            broadcaster,
            history,
        }
    }

    /// 接続開始を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 新しい接続の ID
    /// * `sender` - 接続へのフレーム送信用チャンネル
    pub async fn execute(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.message_pusher
            .register_client(connection_id, sender)
            .await;

        let recent = self.history.recent().await;
        tracing::debug!(
            "Sending {} history message(s) to connection '{}'",
            recent.len(),
            connection_id
        );
        self.broadcaster
            .to_connection(connection_id, &ServerEvent::History(recent))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tokio::sync::mpsc;

    use super::*;
    use crate::{
        domain::{ChatMessage, MessageStore, MessageText, PresenceRegistry},
        usecase::test_support::{Harness, name, room},
    };

    #[tokio::test]
    async fn test_connect_to_empty_store_sends_empty_history() {
        // テスト項目: 空のストアに接続すると空の history が届く
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.connect_usecase();
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        usecase.execute(ConnectionId::generate(), tx).await;

        // then (期待する結果):
        assert_eq!(
            rx.recv().await,
            Some(r#"{"event":"history","data":[]}"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_connect_sends_last_50_across_rooms() {
        // テスト項目: 50 件を超えるログがある場合、最新 50 件が全ルーム横断で届く
        // given (前提条件):
        let harness = Harness::new();
        for i in 0..55 {
            let target = if i % 2 == 0 { "main" } else { "dev" };
            let message = ChatMessage::new(
                MessageText::truncate(&format!("m{i}")),
                name("Alice"),
                room(target),
                Utc::now(),
            );
            harness.store.append(&message).await.unwrap();
        }
        let usecase = harness.connect_usecase();
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        usecase.execute(ConnectionId::generate(), tx).await;

        // then (期待する結果):
        let frame: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        let history = frame["data"].as_array().unwrap();
        assert_eq!(history.len(), 50);
        assert_eq!(history[0]["text"], "m5");
        assert_eq!(history[49]["text"], "m54");
    }

    #[tokio::test]
    async fn test_connect_does_not_create_session() {
        // テスト項目: 接続しただけではセッションは作られない
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.connect_usecase();
        let connection_id = ConnectionId::generate();
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        usecase.execute(connection_id, tx).await;

        // then (期待する結果):
        assert!(harness.registry.get(connection_id).await.is_none());
    }
}
