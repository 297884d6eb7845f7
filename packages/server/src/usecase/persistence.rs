//! Ordered background writer in front of the message store.
//!
//! Records are appended by a single task in the order they were enqueued, so
//! enqueue order equals append order. Callers never wait on the durable write
//! unless they hold on to the receipt and await it.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::domain::{ChatMessage, MessageStore, StoreError};

enum Job {
    Append {
        message: ChatMessage,
        done: oneshot::Sender<Result<(), StoreError>>,
    },
    Flush(oneshot::Sender<()>),
}

/// Completion of one queued append
#[derive(Debug)]
pub struct PersistenceReceipt(oneshot::Receiver<Result<(), StoreError>>);

impl PersistenceReceipt {
    /// Wait until the record is durable (or the write failed).
    pub async fn confirmed(self) -> Result<(), StoreError> {
        self.0.await.unwrap_or_else(|_| {
            Err(StoreError::Persistence(
                "persistence writer stopped".to_string(),
            ))
        })
    }
}

pub struct PersistenceQueue {
    jobs: mpsc::UnboundedSender<Job>,
}

impl PersistenceQueue {
    /// Spawn the writer task. Must be called inside a tokio runtime.
    pub fn spawn(store: Arc<dyn MessageStore>) -> Self {
        let (jobs, rx) = mpsc::unbounded_channel();
        tokio::spawn(writer_loop(store, rx));
        Self { jobs }
    }

    /// Queue `message` for appending. Never waits on the store.
    pub fn enqueue(&self, message: ChatMessage) -> PersistenceReceipt {
        let (done, receipt) = oneshot::channel();
        if self.jobs.send(Job::Append { message, done }).is_err() {
            tracing::error!("Persistence writer is gone, message will not be stored");
        }
        PersistenceReceipt(receipt)
    }

    /// Wait until everything queued so far has been written.
    pub async fn flush(&self) {
        let (done, flushed) = oneshot::channel();
        if self.jobs.send(Job::Flush(done)).is_err() {
            return;
        }
        let _ = flushed.await;
    }
}

async fn writer_loop(store: Arc<dyn MessageStore>, mut rx: mpsc::UnboundedReceiver<Job>) {
    while let Some(job) = rx.recv().await {
        match job {
            Job::Append { message, done } => {
                let result = store.append(&message).await;
                if let Err(e) = &result {
                    tracing::error!(
                        "Failed to persist message from '{}' in room '{}': {}",
                        message.display_name,
                        message.room,
                        e
                    );
                }
                // 受領証を捨てた送信者もいる
                let _ = done.send(result);
            }
            Job::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("Persistence writer stopped");
}
