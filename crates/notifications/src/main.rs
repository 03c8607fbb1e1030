use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use catalog_events::PRODUCT_EVENTS_QUEUE;
use catalog_infra::{event_bus, shutdown, NotificationsConfig};
use catalog_notifications::{AmqpSubscription, NotificationConsumer};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    catalog_observability::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = ?err, "notifications service failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = NotificationsConfig::from_env().context("load config")?;

    let conn = event_bus::connect(&cfg.rabbitmq_url)
        .await
        .context("connect rabbitmq")?;

    let subscription = Arc::new(
        AmqpSubscription::new(&conn, PRODUCT_EVENTS_QUEUE)
            .await
            .context("init consumer")?,
    );

    let token = CancellationToken::new();
    let mut task = tokio::spawn({
        let subscription = Arc::clone(&subscription);
        let token = token.clone();
        async move {
            let consumer = NotificationConsumer::default();
            subscription.run(&consumer, token).await
        }
    });

    info!(queue = PRODUCT_EVENTS_QUEUE, "notifications service started");

    tokio::select! {
        _ = shutdown::signal() => {
            info!("shutdown signal received");
            token.cancel();
            match tokio::time::timeout(cfg.shutdown_timeout, &mut task).await {
                Ok(Ok(Ok(exit))) => info!(?exit, "consumer stopped"),
                Ok(Ok(Err(err))) => warn!(error = %err, "consumer stopped with error"),
                Ok(Err(err)) => warn!(error = %err, "consumer task panicked"),
                Err(_) => warn!("consumer shutdown timeout reached"),
            }
        }
        joined = &mut task => {
            let exit = joined.context("consumer task")?.context("start consumer")?;
            info!(?exit, "consumer stopped");
        }
    }

    if let Err(err) = subscription.close().await {
        warn!(error = %err, "close consumer channel failed");
    }
    if let Err(err) = conn.close(200, "shutdown").await {
        warn!(error = %err, "close rabbitmq connection failed");
    }

    info!("notifications service stopped");
    Ok(())
}
