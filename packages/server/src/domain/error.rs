//! Domain errors.

use thiserror::Error;

use super::value_object::ConnectionId;

/// Errors raised by the presence registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The connection has no session
    #[error("Connection '{0}' has no session")]
    UnknownConnection(ConnectionId),
}

/// Errors raised by the message store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Durable write or read failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A record could not be encoded
    #[error("Failed to encode message record: {0}")]
    Encoding(String),
}

/// Errors raised when pushing an event to a connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// No outbound channel is registered for the connection
    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    /// The outbound channel is closed
    #[error("Failed to push message: {0}")]
    PushFailed(String),
}
