//! UseCase: 起動時のカウンタ初期化

use std::sync::Arc;

use crate::domain::{CONNECTION_COUNT_KEY, CounterStore, StoreError};

/// 共有カウンタが存在しなければ 0 で作成するユースケース
///
/// 既存の値は上書きしないため、何度実行しても他インスタンスの接続数を壊さない。
pub struct InitializeCounterUseCase {
    counter_store: Arc<dyn CounterStore>,
}

impl InitializeCounterUseCase {
    pub fn new(counter_store: Arc<dyn CounterStore>) -> Self {
        Self { counter_store }
    }

    /// カウンタを作成した場合は `true`、既に存在した場合は `false`
    pub async fn execute(&self) -> Result<bool, StoreError> {
        let created = self
            .counter_store
            .init_if_absent(CONNECTION_COUNT_KEY)
            .await?;
        if created {
            tracing::info!("Initialized '{}' to 0", CONNECTION_COUNT_KEY);
        } else {
            tracing::info!("'{}' already exists, keeping its value", CONNECTION_COUNT_KEY);
        }
        Ok(created)
    }
}
