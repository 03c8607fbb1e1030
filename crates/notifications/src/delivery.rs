//! Broker-agnostic view of a received message.

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("acknowledgment failed: {0}")]
pub struct AckError(pub String);

/// Settles exactly one in-flight delivery with the broker.
///
/// Neither call is cumulative: only the message this acknowledger belongs to
/// is affected.
#[async_trait]
pub trait Acknowledger: Send + Sync {
    /// Remove the message from the queue permanently.
    async fn ack(&self) -> Result<(), AckError>;

    /// Reject the message; with `requeue` it goes back on the queue.
    async fn nack(&self, requeue: bool) -> Result<(), AckError>;
}

/// A message delivered under manual acknowledgment.
pub struct InboundMessage {
    pub body: Vec<u8>,
    /// Set by the broker when this is not the first delivery attempt.
    pub redelivered: bool,
    pub acker: Box<dyn Acknowledger>,
}

impl InboundMessage {
    pub fn new(body: impl Into<Vec<u8>>, redelivered: bool, acker: Box<dyn Acknowledger>) -> Self {
        Self {
            body: body.into(),
            redelivered,
            acker,
        }
    }
}

impl core::fmt::Debug for InboundMessage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InboundMessage")
            .field("body_len", &self.body.len())
            .field("redelivered", &self.redelivered)
            .finish_non_exhaustive()
    }
}
