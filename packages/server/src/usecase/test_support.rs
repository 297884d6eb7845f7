//! Test fixtures shared by the use case tests.
//!
//! Connections are simulated by registering an mpsc channel with the real
//! `WebSocketMessagePusher`, so assertions run against the JSON frames a
//! WebSocket client would receive.

use std::sync::Arc;

use parlor_shared::time::{Clock, MonotonicClock, SystemClock};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, DisplayName, MessagePusher, MessageStore, PresenceRegistry, RoomName},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryMessageStore, InMemoryPresenceRegistry},
    },
};

use super::{
    ConnectUseCase, DisconnectUseCase, HistoryService, JoinRoomUseCase, PersistenceQueue,
    RoomBroadcaster, SendMessageUseCase, SessionCoordinator, SwitchRoomUseCase, TypingUseCase,
    history::DEFAULT_HISTORY_LIMIT,
};

pub fn name(value: &str) -> DisplayName {
    DisplayName::normalize(Some(value))
}

pub fn room(value: &str) -> RoomName {
    RoomName::normalize(Some(value))
}

pub struct Harness {
    pub registry: Arc<InMemoryPresenceRegistry>,
    pub store: Arc<dyn MessageStore>,
    pub pusher: Arc<WebSocketMessagePusher>,
    pub broadcaster: Arc<RoomBroadcaster>,
    pub history: Arc<HistoryService>,
    pub clock: Arc<dyn Clock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryMessageStore::new()))
    }

    pub fn with_store(store: Arc<dyn MessageStore>) -> Self {
        let registry = Arc::new(InMemoryPresenceRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let broadcaster = Arc::new(RoomBroadcaster::new(registry.clone(), pusher.clone()));
        let history = Arc::new(HistoryService::new(store.clone(), DEFAULT_HISTORY_LIMIT));
        Self {
            registry,
            store,
            pusher,
            broadcaster,
            history,
            clock: Arc::new(MonotonicClock::new(SystemClock)),
        }
    }

    /// Open a transport channel without any session.
    pub async fn open(&self) -> TestClient {
        let id = ConnectionId::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        self.pusher.register_client(id, tx).await;
        TestClient { id, rx }
    }

    /// Open a channel and place its session directly in the registry.
    pub async fn connect_as(&self, display_name: &str, room_name: &str) -> TestClient {
        let client = self.open().await;
        self.registry
            .upsert(client.id, name(display_name), room(room_name))
            .await;
        client
    }

    pub fn connect_usecase(&self) -> ConnectUseCase {
        ConnectUseCase::new(self.pusher.clone(), self.broadcaster.clone(), self.history.clone())
    }

    pub fn join_room_usecase(&self) -> JoinRoomUseCase {
        JoinRoomUseCase::new(self.registry.clone(), self.broadcaster.clone(), self.history.clone())
    }

    /// Each call spawns its own persistence writer over the shared store.
    pub fn send_message_usecase(&self) -> SendMessageUseCase {
        SendMessageUseCase::new(
            self.registry.clone(),
            Arc::new(PersistenceQueue::spawn(self.store.clone())),
            self.broadcaster.clone(),
            self.clock.clone(),
        )
    }

    pub fn typing_usecase(&self) -> TypingUseCase {
        TypingUseCase::new(self.registry.clone(), self.broadcaster.clone())
    }

    pub fn switch_room_usecase(&self) -> SwitchRoomUseCase {
        SwitchRoomUseCase::new(
            self.registry.clone(),
            self.broadcaster.clone(),
            self.history.clone(),
        )
    }

    pub fn disconnect_usecase(&self) -> DisconnectUseCase {
        DisconnectUseCase::new(self.registry.clone(), self.pusher.clone(), self.broadcaster.clone())
    }

    pub fn coordinator(&self) -> SessionCoordinator {
        SessionCoordinator::new(
            self.registry.clone(),
            self.store.clone(),
            self.pusher.clone(),
            self.clock.clone(),
            DEFAULT_HISTORY_LIMIT,
        )
    }

    pub async fn roster(&self, room_name: &str) -> Vec<String> {
        self.registry
            .list_display_names(&room(room_name))
            .await
            .into_iter()
            .map(DisplayName::into_string)
            .collect()
    }
}

/// The receiving end of a simulated connection
pub struct TestClient {
    pub id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
}

impl TestClient {
    /// Take every frame received so far, decoded as JSON.
    pub fn drain(&mut self) -> Vec<Value> {
        let mut frames = Vec::new();
        while let Ok(frame) = self.rx.try_recv() {
            frames.push(serde_json::from_str(&frame).expect("frame should be JSON"));
        }
        frames
    }

    /// Payloads of the drained frames whose event is `event`.
    pub fn take(&mut self, event: &str) -> Vec<Value> {
        self.drain()
            .into_iter()
            .filter(|frame| frame["event"] == event)
            .map(|frame| frame["data"].clone())
            .collect()
    }

    pub fn system_messages(&mut self) -> Vec<String> {
        self.take("system message")
            .into_iter()
            .filter_map(|data| data.as_str().map(str::to_string))
            .collect()
    }

    pub fn chat_texts(&mut self) -> Vec<String> {
        self.take("chat message")
            .into_iter()
            .filter_map(|data| data["text"].as_str().map(str::to_string))
            .collect()
    }

    pub fn last_user_list(&mut self) -> Option<Vec<String>> {
        self.take("user list").pop().map(|data| {
            data.as_array()
                .map(|names| {
                    names
                        .iter()
                        .filter_map(|n| n.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default()
        })
    }
}
