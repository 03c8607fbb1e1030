//! Broker-backed event publishing.
//!
//! The publishing abstraction lives in `catalog-events` as pure mechanics.
//! This module provides the RabbitMQ implementation and the queue/channel
//! helpers the notifications consumer shares with it.

pub mod rabbitmq;

pub use rabbitmq::{connect, open_queue_channel, AmqpError, RabbitPublisher};
