//! Shared counter store port.

use async_trait::async_trait;

use super::StoreError;

/// A key/value store holding integer counters shared by every instance.
///
/// Every mutation is a single atomic operation on the store side; callers
/// never read-modify-write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Set `key` to zero unless it already exists. Returns `true` if it was created.
    async fn init_if_absent(&self, key: &str) -> Result<bool, StoreError>;

    /// Atomically add one and return the new value.
    async fn increment(&self, key: &str) -> Result<i64, StoreError>;

    /// Atomically subtract `amount`, flooring the stored value at zero, and
    /// return the new value.
    async fn decrement_clamped(&self, key: &str, amount: u64) -> Result<i64, StoreError>;

    /// Read the current value, `None` if the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<i64>, StoreError>;
}
