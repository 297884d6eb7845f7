//! UseCase 層のエラー定義

use thiserror::Error;

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    /// 誰もおらず、メッセージも無いルーム
    #[error("Room '{0}' not found")]
    RoomNotFound(String),
}
