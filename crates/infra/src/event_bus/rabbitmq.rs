//! RabbitMQ-backed event publisher (fire-and-forget, AMQP 0-9-1).
//!
//! - **Durable queue**: declared durable, non-exclusive, non-auto-delete,
//!   idempotently, on both the producer and the consumer side
//! - **Default exchange**: messages are routed to the queue by name
//! - **No confirms**: the publish returns once the frame is written; the
//!   returned publisher confirm is dropped unawaited
//! - **Exclusive channel**: each publisher owns its own channel for its lifetime

use async_trait::async_trait;
use lapin::options::{BasicPublishOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use tracing::instrument;

use catalog_events::{EventPublisher, ProductEvent, PublishError, CONTENT_TYPE_JSON};

#[derive(Debug, thiserror::Error)]
pub enum AmqpError {
    #[error("connect to broker: {0}")]
    Connection(lapin::Error),

    #[error("open channel: {0}")]
    Channel(lapin::Error),

    #[error("declare queue {queue:?}: {source}")]
    QueueDeclare {
        queue: String,
        #[source]
        source: lapin::Error,
    },
}

/// Dial the broker. The connection is shared; channels are not.
pub async fn connect(url: &str) -> Result<Connection, AmqpError> {
    Connection::connect(url, ConnectionProperties::default())
        .await
        .map_err(AmqpError::Connection)
}

/// Open a fresh channel and declare `queue` on it.
///
/// Declaration is idempotent as long as every party uses the same flags.
pub async fn open_queue_channel(conn: &Connection, queue: &str) -> Result<Channel, AmqpError> {
    let channel = conn.create_channel().await.map_err(AmqpError::Channel)?;

    if let Err(source) = channel
        .queue_declare(
            queue,
            QueueDeclareOptions {
                durable: true,
                exclusive: false,
                auto_delete: false,
                ..QueueDeclareOptions::default()
            },
            FieldTable::default(),
        )
        .await
    {
        let _ = channel.close(200, "queue declare failed").await;
        return Err(AmqpError::QueueDeclare {
            queue: queue.to_string(),
            source,
        });
    }

    Ok(channel)
}

/// Publishes [`ProductEvent`]s to a single durable queue.
#[derive(Debug)]
pub struct RabbitPublisher {
    channel: Channel,
    queue: String,
}

impl RabbitPublisher {
    pub async fn new(conn: &Connection, queue: impl Into<String>) -> Result<Self, AmqpError> {
        let queue = queue.into();
        let channel = open_queue_channel(conn, &queue).await?;
        Ok(Self { channel, queue })
    }

    pub async fn close(&self) -> Result<(), lapin::Error> {
        self.channel.close(200, "publisher closed").await
    }

    fn transport(&self, err: lapin::Error) -> PublishError {
        PublishError::Transport {
            queue: self.queue.clone(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl EventPublisher for RabbitPublisher {
    #[instrument(
        skip(self, event),
        fields(
            queue = %self.queue,
            event_type = %event.event_type,
            product_id = event.product_id.get()
        )
    )]
    async fn publish(&self, event: &ProductEvent) -> Result<(), PublishError> {
        let payload = event
            .to_bytes()
            .map_err(|e| PublishError::Serialization(e.to_string()))?;

        let _confirm = self
            .channel
            .basic_publish(
                "",
                &self.queue,
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default().with_content_type(CONTENT_TYPE_JSON.into()),
            )
            .await
            .map_err(|e| self.transport(e))?;

        Ok(())
    }
}
