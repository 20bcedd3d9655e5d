//! Process configuration.
//!
//! Every flag falls back to an environment variable, so the server can be
//! configured either way:
//!
//! ```not_rust
//! relay-server --port 3002 --redis-url redis://localhost:6379
//! PORT=3002 REDIS_URL=redis://localhost:6379 relay-server
//! ```

use std::time::Duration;

use axum::http::HeaderValue;
use clap::Parser;
use thiserror::Error;

use crate::domain::{InstanceId, ValueObjectError};

#[derive(Parser, Debug, Clone)]
#[command(name = "relay-server")]
#[command(about = "Horizontally scalable WebSocket chat relay", long_about = None)]
pub struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Origin allowed by CORS (`*` allows any origin)
    #[arg(long, env = "CORS_ORIGIN", default_value = "http://localhost:3000")]
    pub cors_origin: String,

    /// Redis endpoint shared by every instance
    #[arg(long, env = "REDIS_URL")]
    pub redis_url: Option<String>,

    /// Identifier attached to relayed messages (defaults to the port)
    #[arg(long, env = "INSTANCE_ID")]
    pub instance_id: Option<String>,

    /// Upper bound for the shutdown counter correction, in milliseconds
    #[arg(long, env = "SHUTDOWN_GRACE_MS", default_value_t = 2000)]
    pub shutdown_grace_ms: u64,

    /// Upper bound for a single Redis command, in milliseconds
    #[arg(long, env = "REDIS_COMMAND_TIMEOUT_MS", default_value_t = 2000)]
    pub redis_command_timeout_ms: u64,
}

/// Errors that make the configuration unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("REDIS_URL is not set")]
    MissingRedisUrl,

    #[error("invalid CORS origin '{0}'")]
    InvalidCorsOrigin(String),

    #[error("REDIS_COMMAND_TIMEOUT_MS must be greater than zero")]
    ZeroRedisCommandTimeout,

    #[error("invalid instance id: {0}")]
    InvalidInstanceId(#[from] ValueObjectError),
}

/// Origins accepted by the CORS layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigin {
    Any,
    Exact(HeaderValue),
}

impl CorsOrigin {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let value = value.trim();
        if value == "*" {
            return Ok(Self::Any);
        }
        HeaderValue::from_str(value)
            .map(Self::Exact)
            .map_err(|_| ConfigError::InvalidCorsOrigin(value.to_string()))
    }
}

/// Settings of one relay instance.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: CorsOrigin,
    /// `None` uses the port the listener actually bound.
    pub instance_id: Option<InstanceId>,
    pub shutdown_grace: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 3001,
            cors_origin: CorsOrigin::Exact(HeaderValue::from_static("http://localhost:3000")),
            instance_id: None,
            shutdown_grace: Duration::from_millis(2000),
        }
    }
}

/// Validated configuration of the whole process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub redis_url: String,
    /// Commands still unanswered after this long fail instead of waiting
    /// for a reconnect.
    pub redis_command_timeout: Duration,
    pub server: ServerConfig,
}

impl TryFrom<Args> for AppConfig {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let redis_url = args
            .redis_url
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingRedisUrl)?;
        let instance_id = args.instance_id.map(InstanceId::new).transpose()?;
        if args.redis_command_timeout_ms == 0 {
            return Err(ConfigError::ZeroRedisCommandTimeout);
        }

        Ok(Self {
            redis_url,
            redis_command_timeout: Duration::from_millis(args.redis_command_timeout_ms),
            server: ServerConfig {
                host: args.host,
                port: args.port,
                cors_origin: CorsOrigin::parse(&args.cors_origin)?,
                instance_id,
                shutdown_grace: Duration::from_millis(args.shutdown_grace_ms),
            },
        })
    }
}
