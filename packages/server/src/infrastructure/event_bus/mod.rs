//! Event bus implementations.
//!
//! - `redis`: Redis pub/sub, one publisher and one subscriber connection
//! - `inmemory`: an in-process broker that any number of instances attach to

pub mod inmemory;
pub mod redis;

pub use inmemory::{InMemoryBroker, InMemoryEventBus};
pub use redis::RedisEventBus;

/// Buffered deliveries per instance before a slow listener starts lagging.
pub(crate) const DELIVERY_CAPACITY: usize = 1024;
