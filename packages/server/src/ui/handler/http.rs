//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::http::{HealthDto, InstanceDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(HealthDto::ok(state.port))
}

/// Current state of this instance
pub async fn instance_status(State(state): State<Arc<AppState>>) -> Json<InstanceDto> {
    let status = state.get_instance_status_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(InstanceDto {
        instance_id: status.instance_id.into_string(),
        port: state.port,
        state: status.state.to_string(),
        local_connections: status.local_connections,
    })
}
