//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Response of `GET /healthcheck`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    pub port: u16,
}

impl HealthDto {
    pub fn ok(port: u16) -> Self {
        Self {
            status: "ok".to_string(),
            port,
        }
    }
}

/// Response of `GET /api/instance`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceDto {
    pub instance_id: String,
    pub port: u16,
    pub state: String,
    pub local_connections: usize,
}
