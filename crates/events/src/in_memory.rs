//! In-memory publisher for tests/dev.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::publisher::{EventPublisher, PublishError};
use crate::ProductEvent;

const IN_MEMORY_QUEUE: &str = "in-memory";

/// Records every published event instead of sending it anywhere.
///
/// - No IO
/// - Can be switched into a failing mode to simulate a broker outage
#[derive(Debug, Default)]
pub struct InMemoryPublisher {
    events: Mutex<Vec<ProductEvent>>,
    failing: AtomicBool,
}

impl InMemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A publisher whose every publish fails with a transport error.
    ///
    /// Attempts are still recorded so tests can assert a publish was tried.
    pub fn failing() -> Self {
        let publisher = Self::default();
        publisher.set_failing(true);
        publisher
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of all publish attempts, in call order.
    pub fn events(&self) -> Vec<ProductEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EventPublisher for InMemoryPublisher {
    async fn publish(&self, event: &ProductEvent) -> Result<(), PublishError> {
        let mut events = self.events.lock().map_err(|_| PublishError::Transport {
            queue: IN_MEMORY_QUEUE.to_string(),
            message: "lock poisoned".to_string(),
        })?;
        events.push(event.clone());

        if self.failing.load(Ordering::SeqCst) {
            return Err(PublishError::Transport {
                queue: IN_MEMORY_QUEUE.to_string(),
                message: "broker unavailable".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::ProductId;
    use chrono::Utc;

    #[tokio::test]
    async fn records_events_in_call_order() {
        let publisher = InMemoryPublisher::new();
        let a = ProductEvent::created(ProductId::new(1).unwrap(), "A", Utc::now());
        let b = ProductEvent::deleted(ProductId::new(1).unwrap(), Utc::now());

        publisher.publish(&a).await.unwrap();
        publisher.publish(&b).await.unwrap();

        assert_eq!(publisher.events(), vec![a, b]);
    }

    #[tokio::test]
    async fn failing_mode_reports_transport_error() {
        let publisher = InMemoryPublisher::failing();
        let ev = ProductEvent::deleted(ProductId::new(3).unwrap(), Utc::now());

        let err = publisher.publish(&ev).await.unwrap_err();
        assert!(matches!(err, PublishError::Transport { .. }));
        assert_eq!(publisher.events().len(), 1);
    }
}
