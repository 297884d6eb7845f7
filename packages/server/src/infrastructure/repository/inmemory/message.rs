//! InMemory Message Store 実装
//!
//! プロセス終了で消える `Vec` ベースのログ。テストと `--ephemeral` 起動で使用します。

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{ChatMessage, MessageStore, StoreError};

#[derive(Default)]
pub struct InMemoryMessageStore {
    messages: RwLock<Vec<ChatMessage>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(&self, message: &ChatMessage) -> Result<(), StoreError> {
        self.messages.write().await.push(message.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        let messages = self.messages.read().await;
        let start = messages.len().saturating_sub(limit);
        Ok(messages[start..].to_vec())
    }

    async fn all(&self) -> Result<Vec<ChatMessage>, StoreError> {
        Ok(self.messages.read().await.clone())
    }
}
