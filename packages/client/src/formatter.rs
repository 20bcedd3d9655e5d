//! Message formatting utilities for client display.

use chrono::{DateTime, Local, Utc};
use relay_server::infrastructure::dto::websocket::NewMessagePayload;
use relay_shared::time::iso8601_to_timestamp;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a relayed chat message
    ///
    /// Shows the text, the instance that delivered it and its local time.
    pub fn format_new_message(message: &NewMessagePayload) -> String {
        format!(
            "\n\n------------------------------------------------------------\n\
             {}\n\
             via {} at {}\n\
             ------------------------------------------------------------\n",
            message.message,
            message.port,
            Self::format_created_at(&message.created_at)
        )
    }

    /// Format a connection-count update
    pub fn format_connection_count(count: u64) -> String {
        let noun = if count == 1 { "client" } else { "clients" };
        format!("\n* {} {} connected\n", count, noun)
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }

    /// ISO-8601 timestamps are shown as local `HH:MM:SS`; anything else verbatim.
    fn format_created_at(created_at: &str) -> String {
        iso8601_to_timestamp(created_at)
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.with_timezone(&Local).format("%H:%M:%S").to_string())
            .unwrap_or_else(|| created_at.to_string())
    }
}
