//! Domain-level error types.

use thiserror::Error;

/// Validation errors raised by value objects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("message is empty")]
    MessageEmpty,

    #[error("message is too long ({actual} chars, max {max})")]
    MessageTooLong { max: usize, actual: usize },

    #[error("instance id is empty")]
    InstanceIdEmpty,

    #[error("connection count payload is not a non-negative integer: '{0}'")]
    CountMalformed(String),
}

/// Errors raised by the connection registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("session '{0}' is already registered")]
    DuplicateSession(String),

    #[error("registry is closed to new sessions")]
    Closed,
}

/// Errors raised by the shared counter store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("counter store unavailable: {0}")]
    Unavailable(String),

    #[error("counter '{key}' holds a non-integer value")]
    Corrupted { key: String },
}

/// Errors raised by the event bus
#[derive(Debug, Error)]
pub enum BusError {
    #[error("failed to publish to '{channel}': {reason}")]
    PublishFailed { channel: String, reason: String },

    #[error("failed to subscribe to '{channel}': {reason}")]
    SubscribeFailed { channel: String, reason: String },
}
