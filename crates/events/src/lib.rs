//! Product domain events and the publishing abstraction.
//!
//! `ProductEvent` is the only type that crosses the process boundary between
//! the products API (producer) and the notifications service (consumer).

pub mod event;
pub mod in_memory;
pub mod publisher;

pub use event::{EventType, ProductEvent, ReceivedEvent, CONTENT_TYPE_JSON, PRODUCT_EVENTS_QUEUE};
pub use in_memory::InMemoryPublisher;
pub use publisher::{EventPublisher, PublishError};
