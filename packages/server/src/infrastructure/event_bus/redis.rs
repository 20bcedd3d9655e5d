//! Redis pub/sub [`EventBus`].

use async_trait::async_trait;
use fred::{clients::SubscriberClient, prelude::*};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::domain::{BusChannel, BusDelivery, BusError, EventBus};

use super::DELIVERY_CAPACITY;

pub struct RedisEventBus {
    publisher: Client,
    subscriber: SubscriberClient,
    deliveries: broadcast::Sender<BusDelivery>,
}

impl RedisEventBus {
    /// Build the bus and start forwarding the subscriber's messages.
    ///
    /// `subscriber` must be a dedicated connection that restores its
    /// subscriptions after a reconnect (see
    /// [`connect_redis_subscriber`](crate::infrastructure::redis::connect_redis_subscriber)).
    /// Must be called from within a tokio runtime.
    pub fn start(publisher: Client, subscriber: SubscriberClient) -> Self {
        let (deliveries, _) = broadcast::channel(DELIVERY_CAPACITY);
        spawn_forwarder(&subscriber, deliveries.clone());
        Self {
            publisher,
            subscriber,
            deliveries,
        }
    }
}

/// Map raw Redis messages to [`BusDelivery`] values.
///
/// Messages on channels this crate does not know, or with a non-string
/// payload, are dropped.
fn spawn_forwarder(subscriber: &SubscriberClient, deliveries: broadcast::Sender<BusDelivery>) {
    let mut messages = subscriber.message_rx();
    tokio::spawn(async move {
        loop {
            let message = match messages.recv().await {
                Ok(message) => message,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Redis subscriber lagged, {} messages skipped", skipped);
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            let Some(channel) = BusChannel::from_name(&message.channel) else {
                tracing::debug!("Ignoring message on unknown channel '{}'", &*message.channel);
                continue;
            };
            let Some(payload) = message.value.as_string() else {
                tracing::warn!("Ignoring non-string payload on '{}'", channel);
                continue;
            };

            // No receivers just means nobody is listening yet.
            let _ = deliveries.send(BusDelivery::new(channel, payload));
        }
        tracing::debug!("Redis subscriber stream closed");
    });
}

#[async_trait]
impl EventBus for RedisEventBus {
    async fn publish(&self, channel: BusChannel, payload: &str) -> Result<(), BusError> {
        let receivers: i64 = self
            .publisher
            .publish(channel.as_str(), payload)
            .await
            .map_err(|e| BusError::PublishFailed {
                channel: channel.to_string(),
                reason: e.to_string(),
            })?;
        tracing::debug!("Published to '{}' ({} receivers)", channel, receivers);
        Ok(())
    }

    async fn subscribe(&self, channel: BusChannel) -> Result<(), BusError> {
        self.subscriber
            .subscribe(channel.as_str())
            .await
            .map_err(|e| BusError::SubscribeFailed {
                channel: channel.to_string(),
                reason: e.to_string(),
            })
    }

    fn deliveries(&self) -> broadcast::Receiver<BusDelivery> {
        self.deliveries.subscribe()
    }
}
