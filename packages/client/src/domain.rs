//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use relay_server::infrastructure::dto::websocket::{
    ClientEvent, ServerEvent, SubmitMessagePayload,
};

use crate::error::ClientError;

/// Check if the client should exit immediately based on the error type.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::InvalidUrl(_) | ClientError::ReconnectAttemptsExhausted(_)
    )
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// Build the `submit-message` frame for a line typed by the user.
///
/// Blank lines produce no frame; the server would drop them anyway.
pub fn build_submit_frame(line: &str) -> Option<String> {
    if line.trim().is_empty() {
        return None;
    }
    let event = ClientEvent::SubmitMessage(SubmitMessagePayload {
        message: Some(line.to_string()),
    });
    serde_json::to_string(&event).ok()
}

/// Parse a text frame sent by the server.
pub fn parse_server_event(text: &str) -> Option<ServerEvent> {
    serde_json::from_str(text).ok()
}
