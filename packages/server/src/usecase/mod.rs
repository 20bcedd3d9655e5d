//! UseCase layer: the relay's operations, expressed over the domain ports.

mod connect_session;
mod disconnect_session;
mod error;
mod get_instance_status;
mod initialize_counter;
mod reconcile_shutdown;
mod relay_delivery;
mod submit_message;

pub use connect_session::ConnectSessionUseCase;
pub use disconnect_session::DisconnectSessionUseCase;
pub use error::{ConnectError, DisconnectError, ReconcileError, RelayError, SubmitMessageError};
pub use get_instance_status::{GetInstanceStatusUseCase, InstanceStatus};
pub use initialize_counter::InitializeCounterUseCase;
pub use reconcile_shutdown::{ReconcileShutdownUseCase, ShutdownReport};
pub use relay_delivery::RelayDeliveryUseCase;
pub use submit_message::SubmitMessageUseCase;

use crate::domain::{BusChannel, BusError, ConnectionCount, EventBus};

/// 最新の接続数をカウント更新チャンネルに publish する
async fn publish_count(event_bus: &dyn EventBus, count: ConnectionCount) -> Result<(), BusError> {
    event_bus
        .publish(BusChannel::ConnectionCountUpdated, &count.to_string())
        .await
}
