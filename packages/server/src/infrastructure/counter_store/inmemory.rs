//! InMemory CounterStore 実装
//!
//! Redis 実装と同じセマンティクス（set-if-absent、ゼロ下限の減算）を
//! 単一プロセス内で提供します。複数の `Server` インスタンスで共有することで、
//! テストでマルチインスタンス構成を再現できます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{CounterStore, StoreError};

/// インメモリ CounterStore 実装
///
/// 全ての操作は単一のロック区間で完結するため、アトミックに振る舞う。
#[derive(Default)]
pub struct InMemoryCounterStore {
    values: Mutex<HashMap<String, i64>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn init_if_absent(&self, key: &str) -> Result<bool, StoreError> {
        let mut values = self.values.lock().await;
        if values.contains_key(key) {
            return Ok(false);
        }
        values.insert(key.to_string(), 0);
        Ok(true)
    }

    async fn increment(&self, key: &str) -> Result<i64, StoreError> {
        let mut values = self.values.lock().await;
        let value = values.entry(key.to_string()).or_insert(0);
        *value = value.saturating_add(1);
        Ok(*value)
    }

    async fn decrement_clamped(&self, key: &str, amount: u64) -> Result<i64, StoreError> {
        let amount = i64::try_from(amount).unwrap_or(i64::MAX);
        let mut values = self.values.lock().await;
        let value = values.entry(key.to_string()).or_insert(0);
        *value = value.saturating_sub(amount).max(0);
        Ok(*value)
    }

    async fn get(&self, key: &str) -> Result<Option<i64>, StoreError> {
        let values = self.values.lock().await;
        Ok(values.get(key).copied())
    }
}
