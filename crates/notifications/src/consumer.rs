//! Sequential notification consumer loop.
//!
//! Per message: `Received → Processing → {Acknowledged | Requeued}`.
//! A message only counts as acknowledged once the broker took the ack; a
//! failed ack or nack leaves it with the broker for redelivery.
//!
//! - **One at a time**: the next delivery is not polled until the current one
//!   is settled.
//! - **Cooperative cancellation**: the shutdown token is raced only against
//!   the wait for the next delivery, never against an in-flight message.
//!   Undelivered messages stay on the queue for the next start.
//! - **Unbounded requeue**: a body that never decodes is requeued forever.
//!   There is no redelivery counter and no dead-letter target.

use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use catalog_events::ReceivedEvent;

use crate::delivery::InboundMessage;

pub const DEFAULT_CONSUMER_TAG: &str = "notifications-service";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsumerError {
    /// `basic_consume` was refused; fatal at startup.
    #[error("consume queue {queue:?}: {message}")]
    Consume { queue: String, message: String },

    /// The delivery stream reported a broker/channel failure.
    #[error("delivery stream: {0}")]
    Broker(String),

    /// The body is not a valid `ProductEvent`.
    #[error("unmarshal event: {0}")]
    Decode(String),
}

/// How a single message was settled.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The broker accepted the ack; the message is gone.
    Acknowledged,
    /// The message stays with the broker and will be delivered again.
    Requeued,
}

/// Why the listen loop returned. Both are clean exits.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ListenExit {
    Cancelled,
    StreamClosed,
}

/// Decodes, logs and settles product event deliveries.
#[derive(Debug, Clone)]
pub struct NotificationConsumer {
    tag: String,
}

impl Default for NotificationConsumer {
    fn default() -> Self {
        Self::new(DEFAULT_CONSUMER_TAG)
    }
}

impl NotificationConsumer {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Drain `deliveries` until cancelled or the stream ends.
    pub async fn listen<S>(&self, deliveries: S, shutdown: CancellationToken) -> ListenExit
    where
        S: Stream<Item = Result<InboundMessage, ConsumerError>>,
    {
        let mut deliveries = std::pin::pin!(deliveries);

        loop {
            let next = tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!(consumer = %self.tag, "consumer cancelled");
                    return ListenExit::Cancelled;
                }
                next = deliveries.next() => next,
            };

            match next {
                Some(Ok(message)) => {
                    self.handle(message).await;
                }
                Some(Err(err)) => {
                    warn!(consumer = %self.tag, error = %err, "delivery stream failed");
                    return ListenExit::StreamClosed;
                }
                None => {
                    info!(consumer = %self.tag, "delivery stream closed");
                    return ListenExit::StreamClosed;
                }
            }
        }
    }

    /// Process one delivery and settle it with the broker.
    pub async fn handle(&self, message: InboundMessage) -> Outcome {
        match self.process(&message.body) {
            Ok(_) => match message.acker.ack().await {
                Ok(()) => Outcome::Acknowledged,
                Err(err) => {
                    warn!(consumer = %self.tag, error = %err, "ack failed");
                    Outcome::Requeued
                }
            },
            Err(err) => {
                error!(
                    consumer = %self.tag,
                    redelivered = message.redelivered,
                    error = %err,
                    "handle message failed"
                );
                if let Err(err) = message.acker.nack(true).await {
                    warn!(consumer = %self.tag, error = %err, "nack failed");
                }
                Outcome::Requeued
            }
        }
    }

    fn process(&self, body: &[u8]) -> Result<ReceivedEvent, ConsumerError> {
        let received =
            ReceivedEvent::from_bytes(body).map_err(|e| ConsumerError::Decode(e.to_string()))?;
        let event = &received.event;

        info!(
            event_type = %event.event_type,
            product_id = event.product_id.get(),
            name = event.name.as_deref().unwrap_or_default(),
            timestamp = %received.raw_timestamp,
            "notification event"
        );

        Ok(received)
    }
}
