//! JSON Lines Message Store 実装
//!
//! 1 行 1 メッセージの追記専用ファイル。各 append は `sync_data` まで
//! 完了してから返ります。ファイルは open 時に一度だけ読み込み、以降の
//! 読み出しはメモリ上のミラーから返します（ファイルのロックは書き込み専用）。
//! 壊れた行は警告を出して読み飛ばします。

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{
    fs::{self, File, OpenOptions},
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt, SeekFrom},
    sync::{Mutex, RwLock},
};

use crate::{
    domain::{ChatMessage, MessageStore, StoreError},
    infrastructure::dto::websocket::MessageDto,
};

pub struct JsonLinesMessageStore {
    /// Append handle
    file: Mutex<File>,
    /// Every record of the file, in file order
    records: RwLock<Vec<ChatMessage>>,
}

impl JsonLinesMessageStore {
    /// Open (or create) the log at `path` and load its records.
    ///
    /// A trailing partial record left by a crash is terminated so the next
    /// append starts on its own line.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(persistence_error)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .await
            .map_err(persistence_error)?;

        if !ends_with_newline(&mut file).await? {
            tracing::warn!(
                "Message log '{}' ends with a partial record, terminating it",
                path.display()
            );
            file.write_all(b"\n").await.map_err(persistence_error)?;
            file.sync_data().await.map_err(persistence_error)?;
        }

        let records = load_records(&path).await?;
        tracing::info!(
            "Message log opened at '{}' with {} record(s)",
            path.display(),
            records.len()
        );
        Ok(Self {
            file: Mutex::new(file),
            records: RwLock::new(records),
        })
    }
}

#[async_trait]
impl MessageStore for JsonLinesMessageStore {
    async fn append(&self, message: &ChatMessage) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(&MessageDto::from(message))
            .map_err(|e| StoreError::Encoding(e.to_string()))?;
        line.push('\n');

        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes())
            .await
            .map_err(persistence_error)?;
        file.flush().await.map_err(persistence_error)?;
        file.sync_data().await.map_err(persistence_error)?;

        // ファイルのロック中に反映し、ミラーの順序をファイルと揃える
        self.records.write().await.push(message.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        let records = self.records.read().await;
        let start = records.len().saturating_sub(limit);
        Ok(records[start..].to_vec())
    }

    async fn all(&self) -> Result<Vec<ChatMessage>, StoreError> {
        Ok(self.records.read().await.clone())
    }
}

async fn load_records(path: &Path) -> Result<Vec<ChatMessage>, StoreError> {
    let content = fs::read_to_string(path).await.map_err(persistence_error)?;

    Ok(content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match parse_record(line) {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::warn!(
                    "Skipping malformed record at {}:{}: {}",
                    path.display(),
                    index + 1,
                    e
                );
                None
            }
        })
        .collect())
}

fn persistence_error(e: std::io::Error) -> StoreError {
    StoreError::Persistence(e.to_string())
}

fn parse_record(line: &str) -> Result<ChatMessage, String> {
    let dto: MessageDto = serde_json::from_str(line).map_err(|e| e.to_string())?;
    ChatMessage::try_from(dto).map_err(|e| e.to_string())
}

async fn ends_with_newline(file: &mut File) -> Result<bool, StoreError> {
    let len = file.metadata().await.map_err(persistence_error)?.len();
    if len == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1)).await.map_err(persistence_error)?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last).await.map_err(persistence_error)?;
    Ok(last[0] == b'\n')
}
