//! Utilities shared by the relay server and the terminal client.

pub mod logger;
pub mod time;
