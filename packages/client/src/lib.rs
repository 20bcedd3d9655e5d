//! Terminal client for the chat relay.
//!
//! Prints relayed messages and connection-count updates, and submits each line
//! typed at the prompt.

mod domain;
pub mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
