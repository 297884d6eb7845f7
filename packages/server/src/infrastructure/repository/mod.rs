//! Repository implementations.
//!
//! - `inmemory`: `HashMap` / `Vec` backed implementations
//! - `file`: durable JSON Lines message store

pub mod file;
pub mod inmemory;

pub use file::JsonLinesMessageStore;
pub use inmemory::{InMemoryMessageStore, InMemoryPresenceRegistry};
