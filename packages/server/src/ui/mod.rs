//! WebSocket relay server: HTTP surface, bus listener and lifecycle.

mod bus_listener;
mod handler;
mod router;
mod server;
mod signal;
pub mod state;

pub use server::{Server, ServerError};
