//! Shared counter store implementations.
//!
//! - `redis`: production store, atomic via `INCR` and a Lua script
//! - `inmemory`: single-process store with the same semantics, for tests and
//!   local multi-instance simulation

pub mod inmemory;
pub mod redis;

pub use inmemory::InMemoryCounterStore;
pub use redis::RedisCounterStore;
