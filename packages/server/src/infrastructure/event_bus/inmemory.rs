//! InMemory EventBus 実装
//!
//! `InMemoryBroker` がプロセス内の「Redis」の役割を担い、各インスタンスは
//! `InMemoryBroker::connect` で取得した `InMemoryEventBus` を通して
//! publish / subscribe します。
//!
//! - publish されたメッセージは、そのチャンネルを subscribe している
//!   全てのハンドル（publish したハンドル自身を含む）に配送される
//! - 配送は publish 呼び出しの中で同期的に行われるため、チャンネル毎の
//!   FIFO 順序が保たれる

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::{BusChannel, BusDelivery, BusError, EventBus};

use super::DELIVERY_CAPACITY;

/// 1 つのバスハンドルの購読状態
struct Endpoint {
    subscriptions: Mutex<HashSet<BusChannel>>,
    deliveries: broadcast::Sender<BusDelivery>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// プロセス内ブローカー
///
/// Clone したブローカーは同じ購読者集合を共有する。
#[derive(Clone, Default)]
pub struct InMemoryBroker {
    endpoints: Arc<Mutex<Vec<Weak<Endpoint>>>>,
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しいバスハンドル（1 インスタンス分の接続）を作成
    pub fn connect(&self) -> InMemoryEventBus {
        let (deliveries, _) = broadcast::channel(DELIVERY_CAPACITY);
        let endpoint = Arc::new(Endpoint {
            subscriptions: Mutex::new(HashSet::new()),
            deliveries,
        });
        lock(&self.endpoints).push(Arc::downgrade(&endpoint));
        InMemoryEventBus {
            broker: self.clone(),
            endpoint,
        }
    }

    /// 購読者に配送し、配送先のハンドル数を返す
    fn dispatch(&self, delivery: &BusDelivery) -> usize {
        let mut endpoints = lock(&self.endpoints);
        // Drop handles whose instance has gone away.
        endpoints.retain(|weak| weak.strong_count() > 0);

        let mut receivers = 0;
        for endpoint in endpoints.iter().filter_map(Weak::upgrade) {
            if lock(&endpoint.subscriptions).contains(&delivery.channel) {
                let _ = endpoint.deliveries.send(delivery.clone());
                receivers += 1;
            }
        }
        receivers
    }
}

/// `InMemoryBroker` に接続したバスハンドル
pub struct InMemoryEventBus {
    broker: InMemoryBroker,
    endpoint: Arc<Endpoint>,
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(&self, channel: BusChannel, payload: &str) -> Result<(), BusError> {
        let receivers = self.broker.dispatch(&BusDelivery::new(channel, payload));
        tracing::debug!("Published to '{}' ({} receivers)", channel, receivers);
        Ok(())
    }

    async fn subscribe(&self, channel: BusChannel) -> Result<(), BusError> {
        lock(&self.endpoint.subscriptions).insert(channel);
        Ok(())
    }

    fn deliveries(&self) -> broadcast::Receiver<BusDelivery> {
        self.endpoint.deliveries.subscribe()
    }
}
