//! UseCase: シャットダウン時の接続数補正
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ReconcileShutdownUseCase::execute() メソッド
//! - ローカルのセッション数 N を 1 回の減算で共有カウンタから差し引くこと
//!
//! ### なぜこのテストが必要か
//! - 終了するインスタンスの接続が共有カウンタに残り続けるのを防ぐ
//! - 補正は猶予時間内のベストエフォートで、失敗しても終了処理は続行する
//!
//! ### どのような状況を想定しているか
//! - 正常系：A に 3 接続・B に 2 接続、A の終了でカウンタが 3 だけ減る
//! - 異常系：カウンタ減算の失敗、猶予時間の超過、二重のシャットダウン
//! - エッジケース：ローカル接続 0 件

use std::{sync::Arc, time::Duration};

use crate::domain::{
    CONNECTION_COUNT_KEY, ConnectionCount, CounterStore, EventBus, Lifecycle, MessagePusher,
    SessionRepository,
};

use super::{error::ReconcileError, publish_count};

/// シャットダウン補正の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    /// 回収したローカルセッション数
    pub drained_sessions: usize,
    /// 補正後の接続数（補正不要だった場合は `None`）
    pub corrected_count: Option<ConnectionCount>,
}

/// シャットダウン補正のユースケース
pub struct ReconcileShutdownUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    counter_store: Arc<dyn CounterStore>,
    event_bus: Arc<dyn EventBus>,
    lifecycle: Arc<Lifecycle>,
    /// 補正に使える猶予時間
    grace: Duration,
}

impl ReconcileShutdownUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        counter_store: Arc<dyn CounterStore>,
        event_bus: Arc<dyn EventBus>,
        lifecycle: Arc<Lifecycle>,
        grace: Duration,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            counter_store,
            event_bus,
            lifecycle,
            grace,
        }
    }

    /// シャットダウン補正を実行
    ///
    /// 1. `Running -> Draining` に遷移（既に遷移済みなら `NotRunning`）
    /// 2. レジストリを close し、残っているセッション数 N を取得
    /// 3. N > 0 なら共有カウンタから N を減算して publish（猶予時間内）
    /// 4. 成否に関わらず全クライアントの送信チャンネルを閉じる
    pub async fn execute(&self) -> Result<ShutdownReport, ReconcileError> {
        if !self.lifecycle.begin_draining() {
            return Err(ReconcileError::NotRunning);
        }

        // close はセッション数の取得と新規受付の停止を同時に行う
        let drained_sessions = self.repository.close().await.len();
        tracing::info!(
            "Draining: {} local session(s) to reconcile",
            drained_sessions
        );

        let corrected = match tokio::time::timeout(self.grace, self.correct(drained_sessions)).await
        {
            Ok(result) => result,
            Err(_) => Err(ReconcileError::TimedOut {
                grace_ms: self.grace.as_millis(),
            }),
        };

        let closed = self.message_pusher.unregister_all().await;
        tracing::info!("Closed {} client channel(s)", closed);

        corrected.map(|corrected_count| ShutdownReport {
            drained_sessions,
            corrected_count,
        })
    }

    async fn correct(&self, sessions: usize) -> Result<Option<ConnectionCount>, ReconcileError> {
        if sessions == 0 {
            return Ok(None);
        }

        let value = self
            .counter_store
            .decrement_clamped(CONNECTION_COUNT_KEY, sessions as u64)
            .await?;
        let count = ConnectionCount::from_stored(value);
        publish_count(self.event_bus.as_ref(), count).await?;

        tracing::info!(
            "Subtracted {} from '{}', now {}",
            sessions,
            CONNECTION_COUNT_KEY,
            count
        );
        Ok(Some(count))
    }
}
