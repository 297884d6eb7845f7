//! Room Broadcaster: fanout of events to the members of a room.
//!
//! Membership is read from the registry as a snapshot, the registry lock is
//! released, then the event is pushed to every connection of the snapshot.
//! A connection that leaves in between may still receive the event, and a
//! failed push is logged and dropped; neither reaches the caller.

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PresenceRegistry, RoomName, ServerEvent};

pub struct RoomBroadcaster {
    registry: Arc<dyn PresenceRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RoomBroadcaster {
    pub fn new(
        registry: Arc<dyn PresenceRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// Deliver `event` to every connection currently in `room`.
    pub async fn to_room(&self, room: &RoomName, event: &ServerEvent) {
        let targets = self.registry.connections_in(room).await;
        self.dispatch(room, targets, event).await;
    }

    /// Deliver `event` to every connection in `room` except `exclude`.
    pub async fn to_room_except(
        &self,
        room: &RoomName,
        exclude: ConnectionId,
        event: &ServerEvent,
    ) {
        let targets: Vec<ConnectionId> = self
            .registry
            .connections_in(room)
            .await
            .into_iter()
            .filter(|id| *id != exclude)
            .collect();
        self.dispatch(room, targets, event).await;
    }

    /// Deliver `event` to a single connection.
    pub async fn to_connection(&self, connection_id: ConnectionId, event: &ServerEvent) {
        if let Err(e) = self.message_pusher.push_to(connection_id, event).await {
            tracing::warn!("Failed to push event to connection '{}': {}", connection_id, e);
        }
    }

    /// Rebroadcast the roster of `room` to its members.
    pub async fn user_list(&self, room: &RoomName) {
        let names = self.registry.list_display_names(room).await;
        self.to_room(room, &ServerEvent::UserList(names)).await;
    }

    async fn dispatch(&self, room: &RoomName, targets: Vec<ConnectionId>, event: &ServerEvent) {
        if targets.is_empty() {
            return;
        }
        let count = targets.len();
        if let Err(e) = self.message_pusher.broadcast(targets, event).await {
            tracing::warn!("Failed to broadcast to room '{}': {}", room, e);
        } else {
            tracing::debug!("Broadcasted event to {} connection(s) in room '{}'", count, room);
        }
    }
}
