//! Bridges bus deliveries to the relay use case.

use std::sync::Arc;

use tokio::{sync::broadcast::error::RecvError, task::JoinHandle};

use crate::{
    domain::{BusChannel, EventBus},
    usecase::RelayDeliveryUseCase,
};

/// Subscribe to every bus channel and relay deliveries until the bus closes.
///
/// A channel whose subscription fails is logged and left unsubscribed.
pub async fn start_bus_listener(
    event_bus: Arc<dyn EventBus>,
    relay_delivery_usecase: Arc<RelayDeliveryUseCase>,
) -> JoinHandle<()> {
    // Take the receiver first so nothing published right after subscribing is missed
    let mut deliveries = event_bus.deliveries();

    for channel in BusChannel::ALL {
        match event_bus.subscribe(channel).await {
            Ok(()) => tracing::info!("Subscribed to '{}'", channel),
            Err(e) => tracing::error!("{}", e),
        }
    }

    tokio::spawn(async move {
        loop {
            let delivery = match deliveries.recv().await {
                Ok(delivery) => delivery,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Bus listener lagged, {} deliveries skipped", skipped);
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            let channel = delivery.channel;
            match relay_delivery_usecase.execute(delivery).await {
                Ok(delivered) => {
                    tracing::debug!("Relayed '{}' to {} local client(s)", channel, delivered)
                }
                Err(e) => tracing::warn!("Dropping delivery on '{}': {}", channel, e),
            }
        }
        tracing::debug!("Bus listener stopped");
    })
}
