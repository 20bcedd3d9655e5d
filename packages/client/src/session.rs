//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use relay_server::infrastructure::dto::websocket::ServerEvent;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, protocol::Message},
};

use crate::error::ClientError;

use super::{
    domain::{build_submit_frame, parse_server_event},
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

/// Run one WebSocket session.
///
/// Returns `Ok(())` when the user closed the input, and an error when the
/// connection could not be established or was lost.
pub async fn run_client_session(
    url: &str,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url).await.map_err(|e| match e {
        tungstenite::Error::Url(e) => ClientError::InvalidUrl(e.to_string()),
        e => ClientError::ConnectionError(e.to_string()),
    })?;

    tracing::info!("Connected to relay server!");
    println!("\nType messages and press Enter to send. Press Ctrl+C to exit.\n");

    let (mut write, mut read) = ws_stream.split();

    // Spawn a task to handle incoming events; it only ends when the connection does
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted = match parse_server_event(text.as_str()) {
                        Some(ServerEvent::NewMessage(message)) => {
                            MessageFormatter::format_new_message(&message)
                        }
                        Some(ServerEvent::ConnectionCountUpdated(payload)) => {
                            MessageFormatter::format_connection_count(payload.count)
                        }
                        None => MessageFormatter::format_raw_message(text.as_str()),
                    };
                    print!("{}", formatted);
                    redisplay_prompt();
                }
                Ok(Message::Binary(data)) => {
                    print!("{}", MessageFormatter::format_binary_message(data.len()));
                    redisplay_prompt();
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    loop {
        tokio::select! {
            _ = &mut read_task => {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    // Input closed by the user
                    read_task.abort();
                    let _ = write.close().await;
                    return Ok(());
                };
                let Some(frame) = build_submit_frame(&line) else {
                    continue;
                };
                if let Err(e) = write.send(Message::text(frame)).await {
                    read_task.abort();
                    return Err(ClientError::ConnectionError(e.to_string()));
                }
            }
        }
    }
}
