//! Session Coordinator: the per-connection state machine.
//!
//! A connection starts `Unjoined` on `connect` and becomes `Joined(room)` on
//! its first `join` (or `switch room`). Every command is routed to its use
//! case; commands of one connection must be handed in the order received,
//! commands of different connections may interleave freely.

use std::sync::Arc;

use parlor_shared::time::Clock;

use crate::domain::{
    ClientCommand, ConnectionId, MessagePusher, MessageStore, PresenceRegistry, PusherChannel,
    Session,
};

use super::{
    ConnectUseCase, DisconnectUseCase, HistoryService, JoinRoomUseCase, PersistenceQueue,
    RoomBroadcaster, SendMessageUseCase, SwitchRoomUseCase, TypingUseCase,
};

pub struct SessionCoordinator {
    history: Arc<HistoryService>,
    persistence: Arc<PersistenceQueue>,
    connect: ConnectUseCase,
    join_room: JoinRoomUseCase,
    send_message: SendMessageUseCase,
    typing: TypingUseCase,
    switch_room: SwitchRoomUseCase,
    disconnect: DisconnectUseCase,
}

impl SessionCoordinator {
    pub fn new(
        registry: Arc<dyn PresenceRegistry>,
        store: Arc<dyn MessageStore>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        history_limit: usize,
    ) -> Self {
        let broadcaster = Arc::new(RoomBroadcaster::new(
            registry.clone(),
            message_pusher.clone(),
        ));
        let history = Arc::new(HistoryService::new(store.clone(), history_limit));
        let persistence = Arc::new(PersistenceQueue::spawn(store));

        Self {
            connect: ConnectUseCase::new(
                message_pusher.clone(),
                broadcaster.clone(),
                history.clone(),
            ),
            join_room: JoinRoomUseCase::new(
                registry.clone(),
                broadcaster.clone(),
                history.clone(),
            ),
            send_message: SendMessageUseCase::new(
                registry.clone(),
                persistence.clone(),
                broadcaster.clone(),
                clock,
            ),
            typing: TypingUseCase::new(registry.clone(), broadcaster.clone()),
            switch_room: SwitchRoomUseCase::new(
                registry.clone(),
                broadcaster.clone(),
                history.clone(),
            ),
            disconnect: DisconnectUseCase::new(registry, message_pusher, broadcaster),
            history,
            persistence,
        }
    }

    pub fn history(&self) -> Arc<HistoryService> {
        self.history.clone()
    }

    /// Wait until every message sent so far has been written to the store.
    pub async fn flush(&self) {
        self.persistence.flush().await;
    }

    /// Register the connection's outbound channel and send recent history.
    pub async fn connect(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.connect.execute(connection_id, sender).await;
    }

    /// Apply one inbound command of `connection_id`.
    pub async fn handle(&self, connection_id: ConnectionId, command: ClientCommand) {
        match command {
            ClientCommand::Join { display_name, room } => {
                self.join_room
                    .execute(connection_id, display_name, room)
                    .await;
            }
            ClientCommand::SendMessage { text } => {
                self.send_message.execute(connection_id, text).await;
            }
            ClientCommand::Typing { is_typing } => {
                self.typing.execute(connection_id, is_typing).await;
            }
            ClientCommand::SwitchRoom { room } => {
                self.switch_room.execute(connection_id, room).await;
            }
        }
    }

    /// Tear down the connection. Safe to call more than once.
    pub async fn disconnect(&self, connection_id: ConnectionId) -> Option<Session> {
        self.disconnect.execute(connection_id).await
    }
}
