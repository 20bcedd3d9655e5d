//! Domain entities.

use uuid::Uuid;

use super::value_object::{InstanceId, MessageText, Timestamp};

/// A chat message as fanned out to locally attached clients.
///
/// Built by the receiving instance when a raw text arrives on the message
/// channel, so the same published text gets a different `id` and `created_at`
/// on every instance that delivers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: MessageText,
    pub created_at: Timestamp,
    pub origin: InstanceId,
}

impl ChatMessage {
    pub fn new(id: Uuid, text: MessageText, created_at: Timestamp, origin: InstanceId) -> Self {
        Self {
            id,
            text,
            created_at,
            origin,
        }
    }
}
