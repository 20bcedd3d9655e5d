//! UseCase: セッション接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectSessionUseCase::execute() メソッド
//! - レジストリへの追加、共有カウンタの加算、カウント更新の publish
//!
//! ### なぜこのテストが必要か
//! - 接続数はインスタンス間で共有されるため、加算と publish が必ず対になる必要がある
//! - 共有カウンタの障害時でも接続自体は受け付けることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規セッションの接続
//! - 異常系：シャットダウン中の接続、カウンタ加算の失敗
//! - エッジケース：重複したセッション ID

use std::sync::Arc;

use crate::domain::{
    CONNECTION_COUNT_KEY, ConnectionCount, CounterStore, EventBus, Lifecycle, MessagePusher,
    PusherChannel, RegistryError, SessionId, SessionRepository,
};

use super::{error::ConnectError, publish_count};

/// セッション接続のユースケース
pub struct ConnectSessionUseCase {
    /// Repository（ローカルのセッションレジストリ）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（ローカルクライアントへの通知）
    message_pusher: Arc<dyn MessagePusher>,
    /// CounterStore（全インスタンス共有の接続数）
    counter_store: Arc<dyn CounterStore>,
    /// EventBus（インスタンス間の配送）
    event_bus: Arc<dyn EventBus>,
    lifecycle: Arc<Lifecycle>,
}

impl ConnectSessionUseCase {
    /// 新しい ConnectSessionUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        counter_store: Arc<dyn CounterStore>,
        event_bus: Arc<dyn EventBus>,
        lifecycle: Arc<Lifecycle>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            counter_store,
            event_bus,
            lifecycle,
        }
    }

    /// セッション接続を実行
    ///
    /// # Arguments
    ///
    /// * `session_id` - 接続するセッションの ID
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Some(ConnectionCount))` - 接続成功（加算後の接続数）
    /// * `Ok(None)` - 接続は受け付けたが共有カウンタの加算に失敗
    /// * `Err(ConnectError)` - 接続失敗
    pub async fn execute(
        &self,
        session_id: SessionId,
        sender: PusherChannel,
    ) -> Result<Option<ConnectionCount>, ConnectError> {
        // 1. シャットダウン中は受け付けない
        if !self.lifecycle.is_accepting() {
            return Err(ConnectError::Draining);
        }

        // 2. レジストリに追加（close 済みなら Draining）
        self.repository
            .add_session(session_id)
            .await
            .map_err(|e| match e {
                RegistryError::Closed => ConnectError::Draining,
                RegistryError::DuplicateSession(id) => ConnectError::DuplicateSession(id),
            })?;

        // 3. 自分が起こしたカウント更新も届くよう、加算より先に登録
        self.message_pusher.register_client(session_id, sender).await;

        // 4. 共有カウンタを加算して publish
        let count = match self.counter_store.increment(CONNECTION_COUNT_KEY).await {
            Ok(value) => ConnectionCount::from_stored(value),
            Err(e) => {
                tracing::error!(
                    "Failed to increment connection count for '{}': {}",
                    session_id,
                    e
                );
                return Ok(None);
            }
        };
        if let Err(e) = publish_count(self.event_bus.as_ref(), count).await {
            tracing::warn!("Failed to publish connection count {}: {}", count, e);
        }

        Ok(Some(count))
    }
}
