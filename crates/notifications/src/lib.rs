//! Notifications service: drains the product events queue and logs each event.
//!
//! Delivery contract: manual acknowledgment, one message at a time. A message
//! is acknowledged only after it decoded and was logged; anything else is
//! negatively acknowledged with requeue.

pub mod amqp;
pub mod consumer;
pub mod delivery;

pub use amqp::AmqpSubscription;
pub use consumer::{ConsumerError, ListenExit, NotificationConsumer, Outcome};
pub use delivery::{AckError, Acknowledger, InboundMessage};
