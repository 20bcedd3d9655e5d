//! WebSocket chat relay server backed by Redis.
//!
//! Run with:
//! ```not_rust
//! REDIS_URL=redis://localhost:6379 cargo run --bin relay-server
//! cargo run --bin relay-server -- --port 3002 --redis-url redis://localhost:6379
//! ```

use std::{process::ExitCode, sync::Arc};

use clap::Parser;
use relay_server::{
    config::{AppConfig, Args},
    infrastructure::{
        counter_store::RedisCounterStore,
        event_bus::RedisEventBus,
        redis::{connect_redis, connect_redis_subscriber},
    },
    ui::Server,
};
use relay_shared::logger::setup_logger;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let config = match AppConfig::try_from(args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // The publisher connection also serves counter commands; the subscriber
    // connection is dedicated to pub/sub.
    let publisher = match connect_redis(&config.redis_url, config.redis_command_timeout).await {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let subscriber =
        match connect_redis_subscriber(&config.redis_url, config.redis_command_timeout).await {
            Ok(client) => client,
            Err(e) => {
                tracing::error!("{}", e);
                return ExitCode::FAILURE;
            }
        };

    let counter_store = Arc::new(RedisCounterStore::new(publisher.clone()));
    let event_bus = Arc::new(RedisEventBus::start(publisher, subscriber));

    let server = Server::new(config.server, counter_store, event_bus);
    if let Err(e) = server.run().await {
        tracing::error!("{}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
