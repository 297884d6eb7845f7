//! Domain layer for the chat relay.
//!
//! This module contains business rules that are independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod command;
pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use command::ClientCommand;
pub use entity::{ChatMessage, RoomOccupancy, Session};
pub use error::{MessagePushError, RegistryError, StoreError};
pub use event::ServerEvent;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{MessageStore, PresenceRegistry};
#[cfg(test)]
pub use repository::MockMessageStore;
pub use value_object::{ConnectionId, DisplayName, MessageId, MessageText, RoomName};
