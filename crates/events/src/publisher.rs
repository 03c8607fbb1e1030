//! Event publishing abstraction (mechanics only).
//!
//! The publisher is the **producer side** of the notification path: it hands a
//! single [`ProductEvent`] to a broker and reports whether the send call
//! itself succeeded.
//!
//! ## Delivery Guarantees
//!
//! - **Best effort**: no broker confirmation is awaited, no local retry, no
//!   local queue. A failed publish is lost.
//! - **At-least-once downstream**: once the broker accepts a message, the
//!   consumer may still see it more than once (requeue on failure).
//! - **No ordering across producers**.
//!
//! ## Error Handling
//!
//! Serialization and transport failures both surface as [`PublishError`].
//! Callers are expected to log and swallow it: a notification failure must
//! never fail the mutation that triggered it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::ProductEvent;

/// Single failure signal for a publish attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishError {
    /// The event could not be encoded (unreachable for a well-typed caller).
    #[error("serialize event: {0}")]
    Serialization(String),

    /// Broker unreachable, channel closed, or the send was rejected.
    #[error("publish to {queue:?}: {message}")]
    Transport { queue: String, message: String },
}

/// Capability: deliver one event to the notification queue.
///
/// Implementations must be safe to share across request handlers
/// (`Send + Sync`).
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &ProductEvent) -> Result<(), PublishError>;
}

#[async_trait]
impl<P> EventPublisher for Arc<P>
where
    P: EventPublisher + ?Sized,
{
    async fn publish(&self, event: &ProductEvent) -> Result<(), PublishError> {
        (**self).publish(event).await
    }
}
