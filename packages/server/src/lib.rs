//! Horizontally scalable WebSocket chat relay.
//!
//! Each instance accepts WebSocket clients, fans messages out through a shared
//! event bus, and keeps a cluster-wide connection count in a shared counter
//! store.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
