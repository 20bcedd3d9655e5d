//! Value objects of the relay domain.
//!
//! Value objects validate on construction, so anything holding one can rely on
//! its invariant without re-checking.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use super::error::ValueObjectError;

/// Maximum number of characters accepted in a single chat message.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Identifier of one client session, assigned when the transport accepts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of the relay process that enriched a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::InstanceIdEmpty);
        }
        Ok(Self(value))
    }

    /// The default identifier: the port the instance listens on.
    pub fn from_port(port: u16) -> Self {
        Self(port.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for InstanceId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text submitted by a client.
///
/// Non-empty after trimming and at most [`MAX_MESSAGE_CHARS`] characters.
/// The text itself is kept verbatim, surrounding whitespace included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageText(String);

impl MessageText {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::MessageEmpty);
        }
        let chars = value.chars().count();
        if chars > MAX_MESSAGE_CHARS {
            return Err(ValueObjectError::MessageTooLong {
                max: MAX_MESSAGE_CHARS,
                actual: chars,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Total number of live connections across every instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub struct ConnectionCount(u64);

impl ConnectionCount {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Build a count from a raw stored value, clamping negatives to zero.
    pub fn from_stored(value: i64) -> Self {
        Self(u64::try_from(value).unwrap_or(0))
    }

    /// Parse the payload carried on the count-update channel.
    pub fn parse(payload: &str) -> Result<Self, ValueObjectError> {
        payload
            .trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ValueObjectError::CountMalformed(payload.to_string()))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// UTC Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
