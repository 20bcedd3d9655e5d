//! Event bus port.

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::{BusChannel, BusDelivery, BusError};

/// Publish/subscribe transport shared by every instance.
///
/// Deliveries include messages this instance published itself.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, channel: BusChannel, payload: &str) -> Result<(), BusError>;

    async fn subscribe(&self, channel: BusChannel) -> Result<(), BusError>;

    /// A receiver for deliveries on every channel subscribed so far or later.
    ///
    /// Obtain it before subscribing so nothing published in between is lost.
    fn deliveries(&self) -> broadcast::Receiver<BusDelivery>;
}
