use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, post},
    Json, Router,
};
use tracing::{error, warn};

use catalog_core::ProductId;
use catalog_products::{CatalogError, CatalogService};

use crate::app::{dto, errors};
use crate::context::RequestId;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route("/:id", delete(delete_product))
}

pub async fn create_product(
    Extension(services): Extension<Arc<dyn CatalogService>>,
    Extension(request_id): Extension<RequestId>,
    body: Result<Json<dto::CreateProductRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "invalid create product body");
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid request body");
        }
    };

    match services.create_product(&body.name).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => {
            log_failure(&request_id, "create product failed", &e);
            errors::catalog_error_to_response(&e, "failed to create product")
        }
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<dyn CatalogService>>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<dto::ListQuery>,
) -> Response {
    match services.list_products(query.page(), query.limit()).await {
        Ok(listing) => {
            (StatusCode::OK, Json(dto::ListProductsResponse::from(listing))).into_response()
        }
        Err(e) => {
            log_failure(&request_id, "list products failed", &e);
            errors::catalog_error_to_response(&e, "failed to list products")
        }
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<dyn CatalogService>>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "invalid product id");
            return errors::catalog_error_to_response(
                &CatalogError::from(e),
                "failed to delete product",
            );
        }
    };

    match services.delete_product(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            log_failure(&request_id, "delete product failed", &e);
            errors::catalog_error_to_response(&e, "failed to delete product")
        }
    }
}

fn log_failure(request_id: &RequestId, message: &'static str, err: &CatalogError) {
    match err {
        CatalogError::Repository(_) => error!(request_id = %request_id, error = %err, "{message}"),
        CatalogError::Domain(_) => warn!(request_id = %request_id, error = %err, "{message}"),
    }
}
