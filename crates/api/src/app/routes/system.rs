use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use catalog_observability::MetricsRegistry;
use catalog_products::CatalogService;

use crate::app::errors;

pub async fn healthz(Extension(services): Extension<Arc<dyn CatalogService>>) -> Response {
    match services.health().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response(),
        Err(e) => {
            warn!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy" })),
            )
                .into_response()
        }
    }
}

pub async fn metrics(Extension(registry): Extension<MetricsRegistry>) -> Response {
    match registry.render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "render metrics failed");
            errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to render metrics")
        }
    }
}
