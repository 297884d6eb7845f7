//! Data Transfer Objects (DTOs) for the chat relay.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket frame DTOs
//! - `http`: HTTP API response DTOs
//!
//! `MessageDto` is also the on-disk record of the JSON Lines store.

pub mod conversion;
pub mod http;
pub mod websocket;

pub use conversion::ConversionError;
