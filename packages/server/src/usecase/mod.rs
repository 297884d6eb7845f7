//! UseCase layer: the session coordinator and the operations it orchestrates.
//!
//! Each state transition of a connection is one use case with an `execute`
//! method. `SessionCoordinator` owns them and routes inbound commands.

mod broadcast;
mod connect;
mod disconnect;
mod error;
mod get_room_detail;
mod get_rooms;
mod history;
mod join_room;
mod persistence;
mod send_message;
mod session_coordinator;
mod switch_room;
mod typing;

#[cfg(test)]
mod test_support;

pub use broadcast::RoomBroadcaster;
pub use connect::ConnectUseCase;
pub use disconnect::DisconnectUseCase;
pub use error::GetRoomDetailError;
pub use get_room_detail::{GetRoomDetailUseCase, RoomDetail};
pub use get_rooms::GetRoomsUseCase;
pub use history::{DEFAULT_HISTORY_LIMIT, HistoryService};
pub use join_room::JoinRoomUseCase;
pub use persistence::{PersistenceQueue, PersistenceReceipt};
pub use send_message::{SendMessageUseCase, SentMessage};
pub use session_coordinator::SessionCoordinator;
pub use switch_room::{RoomTransition, SwitchRoomUseCase};
pub use typing::TypingUseCase;
