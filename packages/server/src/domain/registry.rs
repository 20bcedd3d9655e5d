//! Per-instance connection registry.

use std::collections::HashSet;

use super::{error::RegistryError, value_object::SessionId};

/// The set of client sessions attached to this instance.
///
/// `remove` reports whether membership actually changed; callers decrement the
/// shared counter only when it did, so a session torn down twice is counted
/// once. Once `close`d, the registry refuses new sessions and its former
/// members are no longer considered attached.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    sessions: HashSet<SessionId>,
    closed: bool,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, session_id: SessionId) -> Result<(), RegistryError> {
        if self.closed {
            return Err(RegistryError::Closed);
        }
        if !self.sessions.insert(session_id) {
            return Err(RegistryError::DuplicateSession(session_id.to_string()));
        }
        Ok(())
    }

    pub fn remove(&mut self, session_id: &SessionId) -> bool {
        self.sessions.remove(session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.iter().copied().collect()
    }

    /// Close the registry and hand back the sessions it still held.
    ///
    /// Calling this again returns an empty list.
    pub fn close(&mut self) -> Vec<SessionId> {
        self.closed = true;
        self.sessions.drain().collect()
    }
}
