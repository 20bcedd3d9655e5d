//! Factories for identifiers generated by the server.

use uuid::Uuid;

use super::SessionId;

/// Generates session ids at transport accept time.
pub struct SessionIdFactory;

impl SessionIdFactory {
    pub fn generate() -> SessionId {
        SessionId::new(Uuid::new_v4())
    }
}

/// Generates chat message ids at delivery time.
pub struct MessageIdFactory;

impl MessageIdFactory {
    pub fn generate() -> Uuid {
        Uuid::new_v4()
    }
}
