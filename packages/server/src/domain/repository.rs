//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    ChatMessage, ConnectionId, DisplayName, RegistryError, RoomName, RoomOccupancy, Session,
    StoreError,
};

/// Append-only message log
///
/// The durable log is the source of truth for history. Messages are returned
/// oldest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// メッセージを末尾に追加（永続化が完了してから返る）
    async fn append(&self, message: &ChatMessage) -> Result<(), StoreError>;

    /// 全ルーム横断で最新 `limit` 件を取得
    async fn recent(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError>;

    /// ログ全体を取得
    async fn all(&self) -> Result<Vec<ChatMessage>, StoreError>;
}

/// Presence Registry trait
///
/// 「どの接続がどのルームに誰としているか」の唯一の情報源。
/// 各操作はそれ自体でアトミックであり、複数操作をまたぐロックは提供しない。
#[async_trait]
pub trait PresenceRegistry: Send + Sync {
    /// セッションを作成または上書き
    async fn upsert(&self, connection_id: ConnectionId, display_name: DisplayName, room: RoomName);

    /// ルームを変更し、変更前のルームを返す
    async fn update_room(
        &self,
        connection_id: ConnectionId,
        new_room: RoomName,
    ) -> Result<RoomName, RegistryError>;

    /// セッションを削除（存在しなければ `None`）
    async fn remove(&self, connection_id: ConnectionId) -> Option<Session>;

    /// ルームにいる表示名のスナップショット（表示名順）
    async fn list_display_names(&self, room: &RoomName) -> Vec<DisplayName>;

    /// セッションを取得
    async fn get(&self, connection_id: ConnectionId) -> Option<Session>;

    /// ルームにいる接続のスナップショット
    async fn connections_in(&self, room: &RoomName) -> Vec<ConnectionId>;

    /// 誰かがいるルームとその名簿（ルーム名順）
    async fn rooms(&self) -> Vec<RoomOccupancy>;
}
