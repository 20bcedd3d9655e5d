//! WebSocket event envelopes.
//!
//! Every text frame is a JSON object `{ "event": <name>, "data": <payload> }`.

use serde::{Deserialize, Serialize};

/// Events sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "submit-message")]
    SubmitMessage(SubmitMessagePayload),
}

/// Payload of `submit-message`
///
/// `message` is optional so that a frame without it is treated like empty
/// text instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitMessagePayload {
    #[serde(default)]
    pub message: Option<String>,
}

/// Events sent to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "new-message")]
    NewMessage(NewMessagePayload),
    #[serde(rename = "connection-count-updated")]
    ConnectionCountUpdated(ConnectionCountPayload),
}

/// Payload of `new-message`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessagePayload {
    pub message: String,
    pub id: String,
    /// ISO-8601 with millisecond precision
    pub created_at: String,
    /// Identifier of the instance that delivered the message
    pub port: String,
}

/// Payload of `connection-count-updated`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionCountPayload {
    pub count: u64,
}
