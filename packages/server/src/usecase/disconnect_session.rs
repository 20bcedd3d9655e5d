//! UseCase: セッション切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectSessionUseCase::execute() メソッド
//! - レジストリからの削除、共有カウンタの減算（0 で下げ止まり）、publish
//!
//! ### なぜこのテストが必要か
//! - 同じセッションの二重切断でカウンタが二重に減らないことを保証
//! - シャットダウン時に回収済みのセッションは減算しない
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続中のセッションの切断
//! - 異常系：存在しないセッションの切断、カウンタ減算の失敗
//! - エッジケース：カウンタが既に 0 の場合

use std::sync::Arc;

use crate::domain::{
    CONNECTION_COUNT_KEY, ConnectionCount, CounterStore, EventBus, MessagePusher, SessionId,
    SessionRepository,
};

use super::{error::DisconnectError, publish_count};

/// セッション切断のユースケース
pub struct DisconnectSessionUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    counter_store: Arc<dyn CounterStore>,
    event_bus: Arc<dyn EventBus>,
}

impl DisconnectSessionUseCase {
    /// 新しい DisconnectSessionUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        counter_store: Arc<dyn CounterStore>,
        event_bus: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            counter_store,
            event_bus,
        }
    }

    /// セッション切断を実行
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectionCount)` - 減算後の接続数
    /// * `Err(DisconnectError::NotConnected)` - レジストリに存在しなかった（減算なし）
    /// * `Err(DisconnectError)` - 共有カウンタまたは publish の失敗
    pub async fn execute(&self, session_id: SessionId) -> Result<ConnectionCount, DisconnectError> {
        self.message_pusher.unregister_client(&session_id).await;

        // レジストリの構成が実際に変わった場合のみ減算する
        if !self.repository.remove_session(&session_id).await {
            return Err(DisconnectError::NotConnected(session_id.to_string()));
        }

        let value = self
            .counter_store
            .decrement_clamped(CONNECTION_COUNT_KEY, 1)
            .await?;
        let count = ConnectionCount::from_stored(value);
        publish_count(self.event_bus.as_ref(), count).await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{BusChannel, BusDelivery, MockCounterStore, SessionIdFactory, StoreError},
        infrastructure::{
            counter_store::InMemoryCounterStore, event_bus::InMemoryBroker,
            message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository,
        },
    };
    use tokio::sync::broadcast;

    async fn create_usecase(
        repository: Arc<InMemorySessionRepository>,
        store: Arc<dyn CounterStore>,
    ) -> (DisconnectSessionUseCase, broadcast::Receiver<BusDelivery>) {
        let bus = Arc::new(InMemoryBroker::new().connect());
        let deliveries = bus.deliveries();
        bus.subscribe(BusChannel::ConnectionCountUpdated)
            .await
            .unwrap();
        let usecase = DisconnectSessionUseCase::new(
            repository,
            Arc::new(WebSocketMessagePusher::default()),
            store,
            bus,
        );
        (usecase, deliveries)
    }

    #[tokio::test]
    async fn test_disconnect_session_success() {
        // テスト項目: 切断でカウンタが 1 減り、新しい合計が publish される
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::default());
        let store = Arc::new(InMemoryCounterStore::new());
        let session_id = SessionIdFactory::generate();
        repository.add_session(session_id).await.unwrap();
        store.increment(CONNECTION_COUNT_KEY).await.unwrap();
        store.increment(CONNECTION_COUNT_KEY).await.unwrap();
        let (usecase, mut deliveries) = create_usecase(repository.clone(), store.clone()).await;

        // when (操作):
        let result = usecase.execute(session_id).await;

        // then (期待する結果):
        assert_eq!(result.unwrap(), ConnectionCount::new(1));
        assert_eq!(repository.count_sessions().await, 0);
        assert_eq!(deliveries.recv().await.unwrap().payload, "1");
    }

    #[tokio::test]
    async fn test_disconnect_twice_decrements_once() {
        // テスト項目: 同じセッションを 2 回切断してもカウンタは 1 回しか減らない
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::default());
        let store = Arc::new(InMemoryCounterStore::new());
        let session_id = SessionIdFactory::generate();
        repository.add_session(session_id).await.unwrap();
        for _ in 0..3 {
            store.increment(CONNECTION_COUNT_KEY).await.unwrap();
        }
        let (usecase, _deliveries) = create_usecase(repository, store.clone()).await;

        // when (操作):
        let first = usecase.execute(session_id).await;
        let second = usecase.execute(session_id).await;

        // then (期待する結果):
        assert!(first.is_ok());
        assert!(matches!(second, Err(DisconnectError::NotConnected(_))));
        assert_eq!(store.get(CONNECTION_COUNT_KEY).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_disconnect_never_publishes_negative_count() {
        // テスト項目: カウンタが既に 0 でも負の値にはならず 0 が publish される
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::default());
        let store = Arc::new(InMemoryCounterStore::new());
        store.init_if_absent(CONNECTION_COUNT_KEY).await.unwrap();
        let session_id = SessionIdFactory::generate();
        repository.add_session(session_id).await.unwrap();
        let (usecase, mut deliveries) = create_usecase(repository, store.clone()).await;

        // when (操作):
        let result = usecase.execute(session_id).await;

        // then (期待する結果):
        assert_eq!(result.unwrap(), ConnectionCount::new(0));
        assert_eq!(store.get(CONNECTION_COUNT_KEY).await.unwrap(), Some(0));
        assert_eq!(deliveries.recv().await.unwrap().payload, "0");
    }

    #[tokio::test]
    async fn test_disconnect_store_failure_is_reported() {
        // テスト項目: カウンタ減算の失敗はエラーとして返り、publish されない
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::default());
        let session_id = SessionIdFactory::generate();
        repository.add_session(session_id).await.unwrap();
        let mut store = MockCounterStore::new();
        store
            .expect_decrement_clamped()
            .times(1)
            .returning(|_, _| Err(StoreError::Unavailable("timeout".to_string())));
        let (usecase, mut deliveries) = create_usecase(repository.clone(), Arc::new(store)).await;

        // when (操作):
        let result = usecase.execute(session_id).await;

        // then (期待する結果): セッション自体はレジストリから外れている
        assert!(matches!(result, Err(DisconnectError::Store(_))));
        assert_eq!(repository.count_sessions().await, 0);
        assert!(deliveries.try_recv().is_err());
    }
}
