//! UseCase: バスから届いたイベントをローカルクライアントへ中継
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayDeliveryUseCase::execute() メソッド
//! - カウント更新とメッセージ配送のローカル fan-out
//!
//! ### なぜこのテストが必要か
//! - メッセージは送信元インスタンス自身のクライアントにも届く必要がある（エコー抑制なし）
//! - ID・時刻・配送元インスタンスは配送時にこのインスタンスが付与する
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ・カウント更新の中継
//! - 異常系：数値として解釈できないカウント、空のメッセージ

use std::sync::Arc;

use relay_shared::time::Clock;

use crate::{
    domain::{
        BusChannel, BusDelivery, ChatMessage, ConnectionCount, InstanceId, MessageIdFactory,
        MessagePusher, MessageText, SessionRepository, Timestamp,
    },
    infrastructure::dto::websocket::ServerEvent,
};

use super::error::RelayError;

/// バス配送の中継ユースケース
pub struct RelayDeliveryUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    /// 配送時にメッセージへ付与するこのインスタンスの ID
    instance_id: InstanceId,
}

impl RelayDeliveryUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        instance_id: InstanceId,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
            instance_id,
        }
    }

    /// 配送を中継し、送信できたローカルクライアント数を返す
    pub async fn execute(&self, delivery: BusDelivery) -> Result<usize, RelayError> {
        let event = match delivery.channel {
            BusChannel::ConnectionCountUpdated => {
                ServerEvent::from(ConnectionCount::parse(&delivery.payload)?)
            }
            BusChannel::NewMessage => {
                let message = ChatMessage::new(
                    MessageIdFactory::generate(),
                    MessageText::new(delivery.payload)?,
                    Timestamp::new(self.clock.now_millis()),
                    self.instance_id.clone(),
                );
                ServerEvent::from(message)
            }
        };
        let json = serde_json::to_string(&event)?;

        let targets = self.repository.session_ids().await;
        Ok(self.message_pusher.broadcast(targets, &json).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{SessionId, SessionIdFactory, ValueObjectError},
        infrastructure::{
            dto::websocket::{ConnectionCountPayload, NewMessagePayload},
            message_pusher::WebSocketMessagePusher,
            repository::InMemorySessionRepository,
        },
    };
    use relay_shared::time::FixedClock;
    use tokio::sync::mpsc;

    const FIXED_TIME: i64 = 1672531200123;

    struct Fixture {
        usecase: RelayDeliveryUseCase,
        receivers: Vec<mpsc::UnboundedReceiver<String>>,
    }

    /// `clients` 個のローカルクライアントが接続済みのインスタンスを作成
    async fn create_fixture(clients: usize) -> Fixture {
        let repository = Arc::new(InMemorySessionRepository::default());
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let mut receivers = Vec::new();
        for _ in 0..clients {
            let session_id: SessionId = SessionIdFactory::generate();
            let (tx, rx) = mpsc::unbounded_channel();
            repository.add_session(session_id).await.unwrap();
            pusher.register_client(session_id, tx).await;
            receivers.push(rx);
        }
        let usecase = RelayDeliveryUseCase::new(
            repository,
            pusher,
            Arc::new(FixedClock::new(FIXED_TIME)),
            InstanceId::new("3002".to_string()).unwrap(),
        );
        Fixture { usecase, receivers }
    }

    #[tokio::test]
    async fn test_relay_message_to_every_local_client() {
        // テスト項目: メッセージが ID・時刻・インスタンス ID 付きで全ローカルクライアントに届く
        // given (前提条件):
        let mut fixture = create_fixture(2).await;

        // when (操作):
        let delivered = fixture
            .usecase
            .execute(BusDelivery::new(BusChannel::NewMessage, "hello"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(delivered, 2);
        for rx in fixture.receivers.iter_mut() {
            let json = rx.recv().await.unwrap();
            let event: ServerEvent = serde_json::from_str(&json).unwrap();
            let ServerEvent::NewMessage(NewMessagePayload {
                message,
                id,
                created_at,
                port,
            }) = event
            else {
                panic!("expected new-message, got {json}");
            };
            assert_eq!(message, "hello");
            assert!(uuid::Uuid::parse_str(&id).is_ok());
            assert_eq!(created_at, "2023-01-01T00:00:00.123Z");
            assert_eq!(port, "3002");
        }
    }

    #[tokio::test]
    async fn test_relay_assigns_fresh_id_per_delivery() {
        // テスト項目: 同じテキストでも配送毎に別の ID が付与される
        // given (前提条件):
        let mut fixture = create_fixture(1).await;

        // when (操作):
        for _ in 0..2 {
            fixture
                .usecase
                .execute(BusDelivery::new(BusChannel::NewMessage, "same"))
                .await
                .unwrap();
        }

        // then (期待する結果):
        let rx = &mut fixture.receivers[0];
        let first: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        let second: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_ne!(first["data"]["id"], second["data"]["id"]);
    }

    #[tokio::test]
    async fn test_relay_connection_count() {
        // テスト項目: カウント更新が数値の count として全ローカルクライアントに届く
        // given (前提条件):
        let mut fixture = create_fixture(1).await;

        // when (操作):
        fixture
            .usecase
            .execute(BusDelivery::new(BusChannel::ConnectionCountUpdated, "5"))
            .await
            .unwrap();

        // then (期待する結果):
        let json = fixture.receivers[0].recv().await.unwrap();
        let event: ServerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(
            event,
            ServerEvent::ConnectionCountUpdated(ConnectionCountPayload { count: 5 })
        );
    }

    #[tokio::test]
    async fn test_malformed_count_is_dropped() {
        // テスト項目: 数値として解釈できないカウントは中継されない
        // given (前提条件):
        let mut fixture = create_fixture(1).await;

        // when (操作):
        let result = fixture
            .usecase
            .execute(BusDelivery::new(BusChannel::ConnectionCountUpdated, "-1"))
            .await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(RelayError::InvalidPayload(ValueObjectError::CountMalformed(_)))
        ));
        assert!(fixture.receivers[0].try_recv().is_err());
    }

    #[tokio::test]
    async fn test_relay_without_local_clients() {
        // テスト項目: ローカルクライアントが居なくてもエラーにならない
        // given (前提条件):
        let fixture = create_fixture(0).await;

        // when (操作):
        let delivered = fixture
            .usecase
            .execute(BusDelivery::new(BusChannel::NewMessage, "nobody"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(delivered, 0);
    }
}
