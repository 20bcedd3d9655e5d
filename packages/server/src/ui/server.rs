//! Server execution logic.

use std::{collections::HashMap, future::Future, sync::Arc};

use relay_shared::time::{Clock, SystemClock};
use thiserror::Error;
use tokio::{net::TcpListener, sync::Mutex, sync::oneshot, time::Instant};

use crate::{
    config::ServerConfig,
    domain::{CounterStore, EventBus, InstanceId, Lifecycle},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository,
    },
    usecase::{
        ConnectSessionUseCase, DisconnectSessionUseCase, GetInstanceStatusUseCase,
        InitializeCounterUseCase, ReconcileError, ReconcileShutdownUseCase, RelayDeliveryUseCase,
        SubmitMessageUseCase,
    },
};

use super::{
    bus_listener::start_bus_listener, router::build_router, signal::shutdown_signal,
    state::AppState,
};

/// Errors that can occur when starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}

/// WebSocket relay server
///
/// One `Server` is one relay instance. Instances share nothing but the
/// counter store and the event bus handed to [`Server::new`].
///
/// # Example
///
/// ```ignore
/// let server = Server::new(config, counter_store, event_bus);
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    counter_store: Arc<dyn CounterStore>,
    event_bus: Arc<dyn EventBus>,
    clock: Arc<dyn Clock>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        config: ServerConfig,
        counter_store: Arc<dyn CounterStore>,
        event_bus: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            config,
            counter_store,
            event_bus,
            clock: Arc::new(SystemClock),
        }
    }

    /// Bind the configured address and serve until Ctrl+C or SIGTERM.
    pub async fn run(self) -> Result<(), ServerError> {
        let bind_addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| ServerError::Bind(format!("bind failed on {bind_addr}: {e}")))?;

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    ///
    /// On shutdown the instance drains: it stops accepting sessions, subtracts
    /// its local sessions from the shared count and closes every socket. The
    /// whole drain shares one `shutdown_grace` window opened by the signal; if
    /// connections are still open when it closes, serving is abandoned.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener
            .local_addr()
            .map_err(|e| ServerError::Bind(format!("listener has no local address: {e}")))?;
        let port = local_addr.port();
        let instance_id = self
            .config
            .instance_id
            .clone()
            .unwrap_or_else(|| InstanceId::from_port(port));
        let grace = self.config.shutdown_grace;

        // Initialize dependencies in order:
        // 1. Repository / MessagePusher (local to this instance)
        // 2. UseCases
        // 3. Startup reconciliation and bus subscriptions
        // 4. AppState / Router
        let lifecycle = Arc::new(Lifecycle::new());
        let repository = Arc::new(InMemorySessionRepository::default());
        let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            HashMap::new(),
        ))));

        let connect_session_usecase = Arc::new(ConnectSessionUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            self.counter_store.clone(),
            self.event_bus.clone(),
            lifecycle.clone(),
        ));
        let disconnect_session_usecase = Arc::new(DisconnectSessionUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            self.counter_store.clone(),
            self.event_bus.clone(),
        ));
        let submit_message_usecase = Arc::new(SubmitMessageUseCase::new(self.event_bus.clone()));
        let get_instance_status_usecase = Arc::new(GetInstanceStatusUseCase::new(
            repository.clone(),
            lifecycle.clone(),
            instance_id.clone(),
        ));
        let relay_delivery_usecase = Arc::new(RelayDeliveryUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            self.clock.clone(),
            instance_id.clone(),
        ));
        let reconcile_shutdown_usecase = ReconcileShutdownUseCase::new(
            repository,
            message_pusher,
            self.counter_store.clone(),
            self.event_bus.clone(),
            lifecycle.clone(),
            grace,
        );

        if let Err(e) = InitializeCounterUseCase::new(self.counter_store.clone())
            .execute()
            .await
        {
            tracing::error!("Failed to initialize connection count: {}", e);
        }
        let bus_listener = start_bus_listener(self.event_bus.clone(), relay_delivery_usecase).await;

        let app_state = Arc::new(AppState {
            connect_session_usecase,
            disconnect_session_usecase,
            submit_message_usecase,
            get_instance_status_usecase,
            lifecycle: lifecycle.clone(),
            port,
        });
        let app = build_router(app_state, &self.config.cors_origin);

        tracing::info!(
            "Relay instance '{}' listening on {}",
            instance_id,
            local_addr
        );
        tracing::info!("Connect to: ws://{}/ws", local_addr);

        let (deadline_tx, deadline_rx) = oneshot::channel::<Instant>();
        let (closed_tx, closed_rx) = oneshot::channel::<()>();
        let graceful = async move {
            shutdown.await;
            let _ = deadline_tx.send(Instant::now() + grace);
            tracing::info!("Shutdown requested, draining");
            match reconcile_shutdown_usecase.execute().await {
                Ok(report) => tracing::info!(
                    "Drained {} session(s), connection count now {}",
                    report.drained_sessions,
                    report
                        .corrected_count
                        .map_or_else(|| "unchanged".to_string(), |c| c.to_string())
                ),
                Err(ReconcileError::NotRunning) => {}
                Err(e) => tracing::error!("Shutdown correction failed: {}", e),
            }
            let _ = closed_tx.send(());
        };

        let serving = async move { axum::serve(listener, app).with_graceful_shutdown(graceful).await };
        let result = tokio::select! {
            result = serving => {
                result.map_err(|e| ServerError::Serve(e.to_string()))
            }
            _ = drain_deadline(deadline_rx, closed_rx) => {
                tracing::warn!("Connections still open after {:?}, forcing termination", grace);
                Ok(())
            }
        };

        bus_listener.abort();
        lifecycle.terminate();
        tracing::info!("Server shutdown complete");

        result
    }
}

/// Resolves when the drain window opened by the shutdown signal closes.
///
/// Never resolves before the client channels are closed. The correction that
/// precedes the close is bounded by the same window.
async fn drain_deadline(deadline: oneshot::Receiver<Instant>, closed: oneshot::Receiver<()>) {
    let Ok(deadline) = deadline.await else {
        // Serving ended before shutdown was requested
        return std::future::pending().await;
    };
    let _ = closed.await;
    tokio::time::sleep_until(deadline).await;
}
