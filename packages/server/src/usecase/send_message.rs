//! UseCase: メッセージ送信処理
//!
//! 送信者の現在のセッション（未参加なら既定値 Anonymous / main）から
//! メッセージを組み立て、永続化キューに積んでからルーム全員（送信者を含む）に
//! 配信します。
//!
//! `sequencer` で直列化するのは時刻の採番とキュー投入だけです。追記順 =
//! 時刻順は保たれ、書き込みの完了は待たずに配信します。遅い書き込みが
//! 他の接続の配信を遅らせることはありません。追記の失敗は書き込みタスクが
//! ログに残し、結果の受領証でも確認できます。

use std::sync::Arc;

use parlor_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, ConnectionId, MessageText, PresenceRegistry, ServerEvent, Session};

use super::{
    RoomBroadcaster,
    persistence::{PersistenceQueue, PersistenceReceipt},
};

/// 送信結果
#[derive(Debug)]
pub struct SentMessage {
    pub message: ChatMessage,
    /// 永続化の完了通知（配信はすでに行われている）
    pub receipt: PersistenceReceipt,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    registry: Arc<dyn PresenceRegistry>,
    persistence: Arc<PersistenceQueue>,
    broadcaster: Arc<RoomBroadcaster>,
    clock: Arc<dyn Clock>,
    sequencer: Mutex<()>,
}

impl SendMessageUseCase {
    pub fn new(
        registry: Arc<dyn PresenceRegistry>,
        persistence: Arc<PersistenceQueue>,
        broadcaster: Arc<RoomBroadcaster>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            persistence,
            broadcaster,
            clock,
            sequencer: Mutex::new(()),
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 送信者の接続 ID
    /// * `text` - 切り詰め済みの本文
    pub async fn execute(&self, connection_id: ConnectionId, text: MessageText) -> SentMessage {
        let session = self.registry.get(connection_id).await;
        let joined = session.is_some();
        let Session {
            display_name, room, ..
        } = session.unwrap_or_else(|| {
            Session::new(connection_id, Default::default(), Default::default())
        });

        let (message, receipt) = {
            let _sequence = self.sequencer.lock().await;
            let message = ChatMessage::new(text, display_name, room, self.clock.now());
            let receipt = self.persistence.enqueue(message.clone());
            (message, receipt)
        };

        let event = ServerEvent::ChatMessage(message.clone());
        self.broadcaster.to_room(&message.room, &event).await;
        if !joined {
            // 未参加の送信者はルームの配信対象に含まれないため、本人にも直接返す
            self.broadcaster.to_connection(connection_id, &event).await;
        }

        SentMessage { message, receipt }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use std::time::{Duration, Instant};

    use async_trait::async_trait;

    use super::*;
    use crate::{
        domain::{MessageStore, MockMessageStore, StoreError},
        infrastructure::repository::InMemoryMessageStore,
        usecase::test_support::{Harness, room},
    };

    /// "slow" という本文の追記だけ時間がかかるストア
    struct SlowStore {
        inner: InMemoryMessageStore,
        delay: Duration,
    }

    #[async_trait]
    impl MessageStore for SlowStore {
        async fn append(&self, message: &ChatMessage) -> Result<(), StoreError> {
            if message.text.as_str() == "slow" {
                tokio::time::sleep(self.delay).await;
            }
            self.inner.append(message).await
        }

        async fn recent(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
            self.inner.recent(limit).await
        }

        async fn all(&self) -> Result<Vec<ChatMessage>, StoreError> {
            self.inner.all().await
        }
    }

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - ルーム全員（送信者含む）への 1 回ずつの配信と、ログへの 1 件の追記
    // - 送信者の現在のセッションからルーム・表示名が決まること
    // - 未参加の送信者の既定値フォールバック
    // - 永続化失敗時も配信が行われること
    // - 遅い書き込みが他の接続の配信を遅らせないこと
    // ========================================

    #[tokio::test]
    async fn test_message_reaches_every_member_once_and_is_stored() {
        // テスト項目: ルーム R の全員（送信者含む）に 1 回ずつ届き、ログに room=R で 1 件追記される
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.send_message_usecase();
        let mut alice = harness.connect_as("Alice", "main").await;
        let mut bob = harness.connect_as("Bob", "main").await;
        let mut carol = harness.connect_as("Carol", "dev").await;

        // when (操作):
        let sent = usecase.execute(alice.id, MessageText::truncate("hi")).await;

        // then (期待する結果):
        assert_eq!(alice.chat_texts(), vec!["hi"]);
        assert_eq!(bob.chat_texts(), vec!["hi"]);
        assert!(carol.drain().is_empty());
        assert_eq!(sent.receipt.confirmed().await, Ok(()));

        let stored = harness.store.all().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].room, room("main"));
        assert_eq!(stored[0], sent.message);
    }

    #[tokio::test]
    async fn test_message_uses_current_session_state() {
        // テスト項目: ルームと表示名は送信者の現在のセッションから取られる
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.send_message_usecase();
        let mut alice = harness.connect_as("Alice", "main").await;
        harness
            .registry
            .update_room(alice.id, room("dev"))
            .await
            .unwrap();

        // when (操作):
        let sent = usecase.execute(alice.id, MessageText::truncate("moved")).await;

        // then (期待する結果):
        assert_eq!(sent.message.room, room("dev"));
        assert_eq!(sent.message.display_name.as_str(), "Alice");
        let payload = &alice.take("chat message")[0];
        assert_eq!(payload["username"], "Alice");
        assert_eq!(payload["room"], "dev");
    }

    #[tokio::test]
    async fn test_unjoined_sender_falls_back_to_defaults() {
        // テスト項目: 未参加の送信者のメッセージは Anonymous / main として扱われ、破棄されない
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.send_message_usecase();
        let mut stranger = harness.open().await;
        let mut main_member = harness.connect_as("Bob", "main").await;

        // when (操作):
        let sent = usecase.execute(stranger.id, MessageText::truncate("hello?")).await;
        sent.receipt.confirmed().await.unwrap();

        // then (期待する結果):
        assert_eq!(sent.message.display_name.as_str(), "Anonymous");
        assert_eq!(sent.message.room.as_str(), "main");
        assert_eq!(stranger.chat_texts(), vec!["hello?"]);
        assert_eq!(main_member.chat_texts(), vec!["hello?"]);
        assert_eq!(harness.store.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_long_text_is_delivered_truncated() {
        // テスト項目: 1000 文字を超える本文は切り詰めて保存・配信される
        // given (前提条件):
        let harness = Harness::new();
        let usecase = harness.send_message_usecase();
        let mut alice = harness.connect_as("Alice", "main").await;

        // when (操作):
        usecase
            .execute(alice.id, MessageText::truncate(&"z".repeat(2000)))
            .await
            .receipt
            .confirmed()
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(alice.chat_texts()[0].chars().count(), 1000);
        let stored = harness.store.all().await.unwrap();
        assert_eq!(stored[0].text.as_str().chars().count(), 1000);
    }

    #[tokio::test]
    async fn test_persistence_failure_still_delivers() {
        // テスト項目: 永続化に失敗してもライブ配信は行われ、失敗は結果で報告される
        // given (前提条件):
        let mut store = MockMessageStore::new();
        store
            .expect_append()
            .times(1)
            .returning(|_| Err(StoreError::Persistence("disk full".to_string())));
        let harness = Harness::with_store(Arc::new(store));
        let usecase = harness.send_message_usecase();
        let mut alice = harness.connect_as("Alice", "main").await;
        let mut bob = harness.connect_as("Bob", "main").await;

        // when (操作):
        let sent = usecase.execute(alice.id, MessageText::truncate("hi")).await;

        // then (期待する結果):
        assert_eq!(alice.chat_texts(), vec!["hi"]);
        assert_eq!(bob.chat_texts(), vec!["hi"]);
        assert_eq!(
            sent.receipt.confirmed().await,
            Err(StoreError::Persistence("disk full".to_string()))
        );
    }

    #[tokio::test]
    async fn test_append_order_matches_timestamp_order() {
        // テスト項目: 同時送信でもログの追記順とタイムスタンプ順が一致する
        // given (前提条件):
        let harness = Harness::new();
        let usecase = Arc::new(harness.send_message_usecase());
        let mut senders = Vec::new();
        for i in 0..8 {
            senders.push(harness.connect_as(&format!("user{i}"), "main").await);
        }

        // when (操作):
        let handles: Vec<_> = senders
            .iter()
            .enumerate()
            .map(|(i, sender)| {
                let usecase = usecase.clone();
                let id = sender.id;
                tokio::spawn(async move {
                    let mut receipts = Vec::new();
                    for j in 0..5 {
                        let sent = usecase
                            .execute(id, MessageText::truncate(&format!("{i}-{j}")))
                            .await;
                        receipts.push(sent.receipt);
                    }
                    receipts
                })
            })
            .collect();
        for handle in handles {
            for receipt in handle.await.unwrap() {
                receipt.confirmed().await.unwrap();
            }
        }

        // then (期待する結果):
        let stored = harness.store.all().await.unwrap();
        assert_eq!(stored.len(), 40);
        assert!(stored.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[tokio::test]
    async fn test_slow_write_does_not_delay_other_connections() {
        // テスト項目: 接続 A の遅い書き込み中でも、別ルームの B の発言はすぐ B に届く
        // given (前提条件):
        let harness = Harness::with_store(Arc::new(SlowStore {
            inner: InMemoryMessageStore::new(),
            delay: Duration::from_millis(800),
        }));
        let usecase = Arc::new(harness.send_message_usecase());
        let a = harness.connect_as("A", "room-a").await;
        let mut b = harness.connect_as("B", "room-b").await;
        let slow = {
            let usecase = usecase.clone();
            let id = a.id;
            tokio::spawn(async move { usecase.execute(id, MessageText::truncate("slow")).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        // when (操作):
        let started = Instant::now();
        let fast = usecase.execute(b.id, MessageText::truncate("fast")).await;
        let elapsed = started.elapsed();

        // then (期待する結果):
        assert!(elapsed < Duration::from_millis(300), "B waited {elapsed:?}");
        assert_eq!(b.chat_texts(), vec!["fast"]);

        // 追記順は送信順のまま
        slow.await.unwrap().receipt.confirmed().await.unwrap();
        fast.receipt.confirmed().await.unwrap();
        let texts: Vec<String> = harness
            .store
            .all()
            .await
            .unwrap()
            .iter()
            .map(|m| m.text.as_str().to_string())
            .collect();
        assert_eq!(texts, vec!["slow", "fast"]);
    }
}
