//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{SessionId, SessionIdFactory},
    infrastructure::dto::websocket::{ClientEvent, SubmitMessagePayload},
    ui::state::AppState,
    usecase::{ConnectError, DisconnectError, SubmitMessageError},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, StatusCode> {
    if !state.lifecycle.is_accepting() {
        tracing::warn!("Rejecting WebSocket upgrade while {}", state.lifecycle.state());
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state)))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// The loop ends when the channel is closed (the session was unregistered,
/// e.g. on shutdown) or the socket can no longer be written; a close frame is
/// sent in the former case.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                return;
            }
        }
        let _ = sender.send(Message::Close(None)).await;
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session_id = SessionIdFactory::generate();
    let (tx, rx) = mpsc::unbounded_channel();

    match state.connect_session_usecase.execute(session_id, tx).await {
        Ok(Some(count)) => {
            tracing::info!("Session '{}' connected ({} in total)", session_id, count);
        }
        Ok(None) => {
            tracing::info!("Session '{}' connected (total unknown)", session_id);
        }
        Err(ConnectError::Draining) => {
            tracing::info!("Session '{}' refused: instance is draining", session_id);
            return;
        }
        Err(e @ ConnectError::DuplicateSession(_)) => {
            tracing::error!("Session '{}' refused: {}", session_id, e);
            return;
        }
    }

    let (sender, mut receiver) = socket.split();
    let state_clone = state.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error on '{}': {}", session_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => handle_client_event(&state_clone, session_id, text.as_str()).await,
                Message::Close(_) => {
                    tracing::debug!("Session '{}' requested close", session_id);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    });

    // Spawn a task to push relayed events to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    match state.disconnect_session_usecase.execute(session_id).await {
        Ok(count) => {
            tracing::info!("Session '{}' disconnected ({} in total)", session_id, count);
        }
        Err(DisconnectError::NotConnected(_)) => {
            // Already accounted for by the shutdown correction
            tracing::debug!("Session '{}' closed after drain", session_id);
        }
        Err(e) => {
            tracing::error!("Failed to record disconnect of '{}': {}", session_id, e);
        }
    }
}

async fn handle_client_event(state: &AppState, session_id: SessionId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!("Ignoring malformed frame from '{}': {}", session_id, e);
            return;
        }
    };

    match event {
        ClientEvent::SubmitMessage(SubmitMessagePayload { message }) => {
            let raw = message.unwrap_or_default();
            match state.submit_message_usecase.execute(raw).await {
                Ok(_) => tracing::debug!("Session '{}' submitted a message", session_id),
                Err(SubmitMessageError::Invalid(e)) => {
                    tracing::debug!("Dropping message from '{}': {}", session_id, e);
                }
                Err(e @ SubmitMessageError::Bus(_)) => {
                    tracing::error!("Failed to relay message from '{}': {}", session_id, e);
                }
            }
        }
    }
}
