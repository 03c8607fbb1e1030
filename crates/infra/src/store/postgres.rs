//! Postgres-backed product store.
//!
//! ## Error Mapping
//!
//! | SQLx Error        | RepositoryError | Scenario |
//! |-------------------|-----------------|----------|
//! | `DELETE` affecting 0 rows | `NotFound` | product already gone |
//! | Database / Io / PoolTimedOut / other | `Storage` | anything else |
//!
//! Rows whose id fails [`ProductId`] validation are reported as `Storage`
//! errors (the `BIGSERIAL` column never produces them).

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::instrument;

use catalog_core::{Product, ProductId};
use catalog_products::{ProductRepository, RepositoryError};

use crate::config::ProductsConfig;

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// Open a connection pool sized from configuration.
pub async fn connect_pool(cfg: &ProductsConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(cfg.db_max_connections)
        .min_connections(cfg.db_min_connections)
        .max_lifetime(cfg.db_max_lifetime)
        .acquire_timeout(cfg.db_acquire_timeout)
        .connect(&cfg.database_url)
        .await
}

/// Apply pending migrations found under `path`.
pub async fn run_migrations(pool: &PgPool, path: &str) -> Result<(), sqlx::migrate::MigrateError> {
    let migrator = sqlx::migrate::Migrator::new(PathBuf::from(path)).await?;
    migrator.run(pool).await
}

/// Product store over the `products` table.
#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage(operation: &str, err: sqlx::Error) -> RepositoryError {
    RepositoryError::Storage(format!("{operation}: {err}"))
}

fn product_from_row(row: &PgRow) -> Result<Product, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| storage("decode id", e))?;
    let name: String = row.try_get("name").map_err(|e| storage("decode name", e))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| storage("decode created_at", e))?;

    let id = ProductId::new(id).map_err(|e| RepositoryError::Storage(e.to_string()))?;
    Ok(Product {
        id,
        name,
        created_at,
    })
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    #[instrument(skip(self), err)]
    async fn create(&self, name: &str) -> Result<Product, RepositoryError> {
        let row = sqlx::query(
            r#"
            INSERT INTO products (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage("insert product", e))?;

        product_from_row(&row)
    }

    #[instrument(skip(self), fields(product_id = id.get()), err)]
    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| storage("delete product", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn list(&self, limit: u32, offset: u64) -> Result<Vec<Product>, RepositoryError> {
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        let rows = sqlx::query(
            r#"
            SELECT id, name, created_at
            FROM products
            ORDER BY id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage("query products", e))?;

        rows.iter().map(product_from_row).collect()
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage("count products", e))?;

        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn health(&self) -> Result<(), RepositoryError> {
        let ping = sqlx::query("SELECT 1").execute(&self.pool);
        match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, ping).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(storage("health check", e)),
            Err(_) => Err(RepositoryError::Storage("health check timed out".to_string())),
        }
    }
}
