//! In-memory repositories.

mod message;
mod presence;

pub use message::InMemoryMessageStore;
pub use presence::InMemoryPresenceRegistry;
