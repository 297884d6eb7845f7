//! Server configuration.

use std::path::PathBuf;

use crate::usecase::DEFAULT_HISTORY_LIMIT;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATA_FILE: &str = "messages.jsonl";

/// Where messages are kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// JSON Lines file, survives restarts
    JsonLines(PathBuf),
    /// Process memory only
    InMemory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageConfig,
    /// Number of messages served as history
    pub history_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            storage: StorageConfig::JsonLines(PathBuf::from(DEFAULT_DATA_FILE)),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
