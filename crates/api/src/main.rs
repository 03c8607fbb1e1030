use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use catalog_api::app::build_app;
use catalog_events::PRODUCT_EVENTS_QUEUE;
use catalog_infra::{event_bus, shutdown, store, PostgresProductRepository, ProductsConfig, RabbitPublisher};
use catalog_observability::{CatalogMetrics, MetricsRegistry};
use catalog_products::{CatalogService, ProductRepository, ProductService};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    catalog_observability::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = ?err, "products api failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = ProductsConfig::from_env().context("load config")?;

    let pool = store::connect_pool(&cfg).await.context("connect postgres")?;
    store::run_migrations(&pool, &cfg.migrations_path)
        .await
        .context("run migrations")?;

    let repo = PostgresProductRepository::new(pool.clone());
    repo.health().await.context("ping postgres")?;

    let conn = event_bus::connect(&cfg.rabbitmq_url)
        .await
        .context("connect rabbitmq")?;
    let publisher = Arc::new(
        RabbitPublisher::new(&conn, PRODUCT_EVENTS_QUEUE)
            .await
            .context("init publisher")?,
    );

    let registry = MetricsRegistry::new();
    let metrics = CatalogMetrics::register(&registry).context("register metrics")?;

    let services: Arc<dyn CatalogService> =
        Arc::new(ProductService::new(repo, Arc::clone(&publisher), metrics));
    let app = build_app(services, registry);

    let listener = tokio::net::TcpListener::bind(&cfg.http_addr)
        .await
        .with_context(|| format!("bind {}", cfg.http_addr))?;
    info!(addr = %cfg.http_addr, "products api listening");

    let token = CancellationToken::new();
    let mut server = tokio::spawn({
        let token = token.clone();
        async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(token.cancelled_owned())
                .await
        }
    });

    tokio::select! {
        _ = shutdown::signal() => {
            info!("shutdown signal received");
            token.cancel();
            match tokio::time::timeout(cfg.shutdown_timeout, &mut server).await {
                Ok(Ok(Ok(()))) => info!("http server drained"),
                Ok(Ok(Err(err))) => warn!(error = %err, "http server stopped with error"),
                Ok(Err(err)) => warn!(error = %err, "http server task panicked"),
                Err(_) => {
                    warn!("http shutdown timeout reached");
                    server.abort();
                }
            }
        }
        joined = &mut server => {
            joined.context("http server task")?.context("serve http")?;
        }
    }

    if let Err(err) = publisher.close().await {
        warn!(error = %err, "close publisher channel failed");
    }
    if let Err(err) = conn.close(200, "shutdown").await {
        warn!(error = %err, "close rabbitmq connection failed");
    }
    pool.close().await;

    info!("products api stopped");
    Ok(())
}
