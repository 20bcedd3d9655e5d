//! Domain layer: value objects, entities, the connection registry and the
//! ports implemented by the infrastructure layer.

pub mod bus;
pub mod channel;
pub mod entity;
pub mod error;
pub mod factory;
pub mod lifecycle;
pub mod pusher;
pub mod registry;
pub mod repository;
pub mod store;
pub mod value_object;

pub use bus::EventBus;
pub use channel::{BusChannel, BusDelivery, CONNECTION_COUNT_KEY};
pub use entity::ChatMessage;
pub use error::{BusError, RegistryError, StoreError, ValueObjectError};
pub use factory::{MessageIdFactory, SessionIdFactory};
pub use lifecycle::{Lifecycle, LifecycleState};
pub use pusher::{MessagePusher, PusherChannel};
pub use registry::ConnectionRegistry;
pub use repository::SessionRepository;
pub use store::CounterStore;
pub use value_object::{
    ConnectionCount, InstanceId, MAX_MESSAGE_CHARS, MessageText, SessionId, Timestamp,
};

#[cfg(test)]
pub use bus::MockEventBus;
#[cfg(test)]
pub use store::MockCounterStore;
