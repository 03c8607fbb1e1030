//! RabbitMQ delivery source for the notification consumer.

use async_trait::async_trait;
use futures::StreamExt;
use lapin::acker::Acker;
use lapin::message::Delivery;
use lapin::options::{BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicQosOptions};
use lapin::types::FieldTable;
use lapin::{Channel, Connection};
use tokio_util::sync::CancellationToken;

use catalog_infra::event_bus::{open_queue_channel, AmqpError};

use crate::consumer::{ConsumerError, ListenExit, NotificationConsumer};
use crate::delivery::{AckError, Acknowledger, InboundMessage};

/// Owns one channel subscribed to the product events queue.
#[derive(Debug)]
pub struct AmqpSubscription {
    channel: Channel,
    queue: String,
}

impl AmqpSubscription {
    /// Open a channel, declare the queue and limit in-flight deliveries to one.
    pub async fn new(conn: &Connection, queue: impl Into<String>) -> Result<Self, AmqpError> {
        let queue = queue.into();
        let channel = open_queue_channel(conn, &queue).await?;

        channel
            .basic_qos(1, BasicQosOptions::default())
            .await
            .map_err(AmqpError::Channel)?;

        Ok(Self { channel, queue })
    }

    /// Start consuming with manual acknowledgment and run the listen loop.
    ///
    /// Only a refused `basic_consume` is an error; cancellation and a closed
    /// channel both return `Ok`.
    pub async fn run(
        &self,
        consumer: &NotificationConsumer,
        shutdown: CancellationToken,
    ) -> Result<ListenExit, ConsumerError> {
        let deliveries = self
            .channel
            .basic_consume(
                &self.queue,
                consumer.tag(),
                BasicConsumeOptions {
                    no_ack: false,
                    ..BasicConsumeOptions::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| ConsumerError::Consume {
                queue: self.queue.clone(),
                message: e.to_string(),
            })?;

        let deliveries = deliveries.map(|delivery| {
            delivery
                .map(InboundMessage::from)
                .map_err(|e| ConsumerError::Broker(e.to_string()))
        });

        Ok(consumer.listen(deliveries, shutdown).await)
    }

    pub async fn close(&self) -> Result<(), lapin::Error> {
        self.channel.close(200, "consumer closed").await
    }
}

impl From<Delivery> for InboundMessage {
    fn from(delivery: Delivery) -> Self {
        InboundMessage::new(
            delivery.data,
            delivery.redelivered,
            Box::new(LapinAcker(delivery.acker)),
        )
    }
}

struct LapinAcker(Acker);

#[async_trait]
impl Acknowledger for LapinAcker {
    async fn ack(&self) -> Result<(), AckError> {
        self.0
            .ack(BasicAckOptions { multiple: false })
            .await
            .map(|_| ())
            .map_err(|e| AckError(e.to_string()))
    }

    async fn nack(&self, requeue: bool) -> Result<(), AckError> {
        self.0
            .nack(BasicNackOptions {
                multiple: false,
                requeue,
            })
            .await
            .map(|_| ())
            .map_err(|e| AckError(e.to_string()))
    }
}
