//! Error types for the relay client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server URL cannot be used at all
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Every reconnection attempt failed
    #[error("Failed to reconnect after {0} attempts")]
    ReconnectAttemptsExhausted(u32),
}
