//! Room-scoped real-time chat relay.
//!
//! Layers, leaves first: `domain` (value objects, entities and the traits at
//! the storage / transport seams), `infrastructure` (their implementations
//! and wire DTOs), `usecase` (the session coordinator) and `ui` (axum).

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
