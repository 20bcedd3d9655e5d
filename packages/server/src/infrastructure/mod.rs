//! Infrastructure layer: adapters for the domain ports and wire DTOs.

pub mod counter_store;
pub mod dto;
pub mod event_bus;
pub mod message_pusher;
pub mod redis;
pub mod repository;
