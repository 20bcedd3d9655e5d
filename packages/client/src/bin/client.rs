//! Terminal chat client for the relay server.
//!
//! Prints every relayed message and connection-count update, and submits
//! each typed line. Automatically reconnects on disconnection (max 5 attempts
//! with 5 second interval), e.g. when the instance it talks to shuts down.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin relay-client
//! cargo run --bin relay-client -- --url ws://127.0.0.1:3002/ws
//! ```

use std::process::ExitCode;

use clap::Parser;

use relay_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "relay-client")]
#[command(about = "Terminal chat client for the relay server", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, env = "RELAY_URL", default_value = "ws://127.0.0.1:3001/ws")]
    url: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = relay_client::run_client(args.url).await {
        tracing::error!("Client error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
