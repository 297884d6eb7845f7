//! InMemory Presence Registry 実装
//!
//! ドメイン層が定義する PresenceRegistry trait の具体的な実装。
//! `HashMap<ConnectionId, Session>` を 1 つの Mutex で保護します。
//! 各メソッドはロックを 1 回だけ取得し、返す前に解放します。

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, DisplayName, PresenceRegistry, RegistryError, RoomName, RoomOccupancy, Session,
};

/// インメモリ Presence Registry 実装
#[derive(Default)]
pub struct InMemoryPresenceRegistry {
    sessions: Mutex<HashMap<ConnectionId, Session>>,
}

impl InMemoryPresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PresenceRegistry for InMemoryPresenceRegistry {
    async fn upsert(&self, connection_id: ConnectionId, display_name: DisplayName, room: RoomName) {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(connection_id, Session::new(connection_id, display_name, room));
    }

    async fn update_room(
        &self,
        connection_id: ConnectionId,
        new_room: RoomName,
    ) -> Result<RoomName, RegistryError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(&connection_id)
            .ok_or(RegistryError::UnknownConnection(connection_id))?;
        Ok(std::mem::replace(&mut session.room, new_room))
    }

    async fn remove(&self, connection_id: ConnectionId) -> Option<Session> {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(&connection_id)
    }

    async fn list_display_names(&self, room: &RoomName) -> Vec<DisplayName> {
        let sessions = self.sessions.lock().await;
        let mut names: Vec<DisplayName> = sessions
            .values()
            .filter(|s| &s.room == room)
            .map(|s| s.display_name.clone())
            .collect();
        names.sort();
        names
    }

    async fn get(&self, connection_id: ConnectionId) -> Option<Session> {
        let sessions = self.sessions.lock().await;
        sessions.get(&connection_id).cloned()
    }

    async fn connections_in(&self, room: &RoomName) -> Vec<ConnectionId> {
        let sessions = self.sessions.lock().await;
        sessions
            .values()
            .filter(|s| &s.room == room)
            .map(|s| s.connection_id)
            .collect()
    }

    async fn rooms(&self) -> Vec<RoomOccupancy> {
        let sessions = self.sessions.lock().await;
        let mut rooms: BTreeMap<RoomName, Vec<DisplayName>> = BTreeMap::new();
        for session in sessions.values() {
            rooms
                .entry(session.room.clone())
                .or_default()
                .push(session.display_name.clone());
        }
        drop(sessions);

        rooms
            .into_iter()
            .map(|(room, mut display_names)| {
                display_names.sort();
                RoomOccupancy {
                    room,
                    display_names,
                }
            })
            .collect()
    }
}
