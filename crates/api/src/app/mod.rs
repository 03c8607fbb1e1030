//! HTTP API application wiring (Axum router).
//!
//! - `routes/`: handlers, one file per area
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use catalog_observability::MetricsRegistry;
use catalog_products::CatalogService;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router (used by `main.rs` and the black-box tests).
pub fn build_app(services: Arc<dyn CatalogService>, metrics: MetricsRegistry) -> Router {
    routes::router()
        .layer(Extension(services))
        .layer(Extension(metrics))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_id))
                .layer(axum::middleware::from_fn(middleware::access_log)),
        )
}
