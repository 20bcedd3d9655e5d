//! Client execution logic with reconnection support.

use std::time::Duration;

use super::{
    domain::{should_attempt_reconnect, should_exit_immediately},
    error::ClientError,
    session::run_client_session,
    ui::spawn_input_reader,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the WebSocket client with reconnection logic
pub async fn run_client(url: String) -> Result<(), ClientError> {
    let mut input_rx = spawn_input_reader();
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} (attempt {}/{})",
            url,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, &mut input_rx).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(e) => {
                if should_exit_immediately(&e) {
                    return Err(e);
                }

                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    return Err(ClientError::ReconnectAttemptsExhausted(
                        MAX_RECONNECT_ATTEMPTS,
                    ));
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }
}
