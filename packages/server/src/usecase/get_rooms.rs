//! UseCase: ルーム一覧取得

use std::sync::Arc;

use crate::domain::{PresenceRegistry, RoomOccupancy};

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    registry: Arc<dyn PresenceRegistry>,
}

impl GetRoomsUseCase {
    pub fn new(registry: Arc<dyn PresenceRegistry>) -> Self {
        Self { registry }
    }

    /// 誰かがいるルームの一覧（ルーム名順）
    pub async fn execute(&self) -> Vec<RoomOccupancy> {
        self.registry.rooms().await
    }
}
