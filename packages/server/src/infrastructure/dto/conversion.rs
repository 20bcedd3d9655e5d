//! Conversion logic from domain models to DTOs.

use relay_shared::time::timestamp_to_iso8601;

use crate::domain::{ChatMessage, ConnectionCount};
use crate::infrastructure::dto::websocket as dto;

impl From<ChatMessage> for dto::NewMessagePayload {
    fn from(model: ChatMessage) -> Self {
        Self {
            message: model.text.into_string(),
            id: model.id.to_string(),
            created_at: timestamp_to_iso8601(model.created_at.value()),
            port: model.origin.into_string(),
        }
    }
}

impl From<ChatMessage> for dto::ServerEvent {
    fn from(model: ChatMessage) -> Self {
        Self::NewMessage(model.into())
    }
}

impl From<ConnectionCount> for dto::ServerEvent {
    fn from(count: ConnectionCount) -> Self {
        Self::ConnectionCountUpdated(dto::ConnectionCountPayload {
            count: count.value(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InstanceId, MessageText, Timestamp};
    use uuid::Uuid;

    #[test]
    fn test_domain_chat_message_to_dto() {
        // テスト項目: ChatMessage が new-message ペイロードに変換される
        // given (前提条件):
        let id = Uuid::new_v4();
        let model = ChatMessage::new(
            id,
            MessageText::new("  hello ".to_string()).unwrap(),
            Timestamp::new(1672531200123),
            InstanceId::new("3002".to_string()).unwrap(),
        );

        // when (操作):
        let payload: dto::NewMessagePayload = model.into();

        // then (期待する結果): テキストはそのまま、時刻は ISO-8601
        assert_eq!(payload.message, "  hello ");
        assert_eq!(payload.id, id.to_string());
        assert_eq!(payload.created_at, "2023-01-01T00:00:00.123Z");
        assert_eq!(payload.port, "3002");
    }

    #[test]
    fn test_connection_count_to_event() {
        // テスト項目: ConnectionCount が connection-count-updated イベントに変換される
        // given (前提条件):
        let count = ConnectionCount::new(5);

        // when (操作):
        let event: dto::ServerEvent = count.into();

        // then (期待する結果):
        assert_eq!(
            event,
            dto::ServerEvent::ConnectionCountUpdated(dto::ConnectionCountPayload { count: 5 })
        );
    }
}
