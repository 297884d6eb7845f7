//! Conversion logic between DTOs and domain entities.

use chrono::{DateTime, Utc};
use thiserror::Error;

use parlor_shared::time::to_rfc3339_millis;

use crate::domain::{
    ChatMessage, DisplayName, MessageId, MessageText, RoomName, RoomOccupancy, ServerEvent,
};
use crate::infrastructure::dto::{
    http::RoomSummaryDto,
    websocket::{MessageDto, ServerFrame, TypingDto},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("Invalid timestamp '{0}'")]
    InvalidTimestamp(String),
}

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<MessageDto> for ChatMessage {
    type Error = ConversionError;

    fn try_from(dto: MessageDto) -> Result<Self, Self::Error> {
        let timestamp = DateTime::parse_from_rfc3339(&dto.timestamp)
            .map_err(|_| ConversionError::InvalidTimestamp(dto.timestamp.clone()))?
            .with_timezone(&Utc);

        Ok(Self {
            id: MessageId::from_uuid(dto.id),
            text: MessageText::truncate(&dto.text),
            display_name: DisplayName::normalize(Some(&dto.username)),
            room: RoomName::normalize(Some(&dto.room)),
            timestamp,
        })
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&ChatMessage> for MessageDto {
    fn from(model: &ChatMessage) -> Self {
        Self {
            id: *model.id.as_uuid(),
            text: model.text.as_str().to_string(),
            username: model.display_name.as_str().to_string(),
            room: model.room.as_str().to_string(),
            timestamp: to_rfc3339_millis(&model.timestamp),
        }
    }
}

impl From<&ServerEvent> for ServerFrame {
    fn from(event: &ServerEvent) -> Self {
        match event {
            ServerEvent::History(messages) => {
                Self::History(messages.iter().map(MessageDto::from).collect())
            }
            ServerEvent::ChatMessage(message) => Self::ChatMessage(message.into()),
            ServerEvent::SystemMessage(text) => Self::SystemMessage(text.clone()),
            ServerEvent::UserList(names) => {
                Self::UserList(names.iter().map(|n| n.as_str().to_string()).collect())
            }
            ServerEvent::Typing {
                display_name,
                is_typing,
            } => Self::Typing(TypingDto {
                username: display_name.as_str().to_string(),
                typing: *is_typing,
            }),
        }
    }
}

impl From<RoomOccupancy> for RoomSummaryDto {
    fn from(model: RoomOccupancy) -> Self {
        Self {
            name: model.room.into_string(),
            users: model
                .display_names
                .into_iter()
                .map(DisplayName::into_string)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message() -> ChatMessage {
        ChatMessage::new(
            MessageText::truncate("hi"),
            DisplayName::normalize(Some("Alice")),
            RoomName::normalize(Some("main")),
            DateTime::from_timestamp_millis(1_672_531_200_123).unwrap(),
        )
    }

    #[test]
    fn test_domain_chat_message_to_dto() {
        // テスト項目: ドメインの ChatMessage が username / RFC 3339 の DTO に変換される
        // given (前提条件):
        let message = sample_message();

        // when (操作):
        let dto = MessageDto::from(&message);

        // then (期待する結果):
        assert_eq!(dto.id, *message.id.as_uuid());
        assert_eq!(dto.text, "hi");
        assert_eq!(dto.username, "Alice");
        assert_eq!(dto.room, "main");
        assert_eq!(dto.timestamp, "2023-01-01T00:00:00.123Z");
    }

    #[test]
    fn test_dto_chat_message_to_domain() {
        // テスト項目: DTO からドメインの ChatMessage に戻すと同じ内容になる
        // given (前提条件):
        let message = sample_message();
        let dto = MessageDto::from(&message);

        // when (操作):
        let restored = ChatMessage::try_from(dto);

        // then (期待する結果):
        assert_eq!(restored, Ok(message));
    }

    #[test]
    fn test_dto_with_invalid_timestamp_is_rejected() {
        // テスト項目: 不正なタイムスタンプの DTO は変換エラーになる
        // given (前提条件):
        let mut dto = MessageDto::from(&sample_message());
        dto.timestamp = "yesterday".to_string();

        // when (操作):
        let result = ChatMessage::try_from(dto);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ConversionError::InvalidTimestamp("yesterday".to_string()))
        );
    }

    #[test]
    fn test_user_list_event_to_frame() {
        // テスト項目: UserList イベントが文字列配列のフレームになる
        // given (前提条件):
        let event = ServerEvent::UserList(vec![
            DisplayName::normalize(Some("Alice")),
            DisplayName::normalize(Some("Bob")),
        ]);

        // when (操作):
        let frame = ServerFrame::from(&event);

        // then (期待する結果):
        assert_eq!(
            frame,
            ServerFrame::UserList(vec!["Alice".to_string(), "Bob".to_string()])
        );
    }
}
