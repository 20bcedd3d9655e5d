//! Axum router construction.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::CorsOrigin;

use super::{
    handler::{health_check, instance_status, websocket_handler},
    state::AppState,
};

/// Build the router:
/// - `GET /ws` -- client event channel
/// - `GET /healthcheck` -- liveness probe
/// - `GET /api/instance` -- this instance's state
pub fn build_router(state: Arc<AppState>, cors_origin: &CorsOrigin) -> Router {
    let cors = match cors_origin {
        CorsOrigin::Any => CorsLayer::new().allow_origin(Any),
        CorsOrigin::Exact(origin) => CorsLayer::new().allow_origin(origin.clone()),
    }
    .allow_methods(Any)
    .allow_headers(Any);

    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/healthcheck", get(health_check))
        .route("/api/instance", get(instance_status))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
