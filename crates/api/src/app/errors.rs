use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use catalog_core::DomainError;
use catalog_products::CatalogError;

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

/// Map a service failure, using `fallback` as the body of a 500.
///
/// Store error details are logged by the caller, never returned.
pub fn catalog_error_to_response(err: &CatalogError, fallback: &'static str) -> Response {
    match err {
        CatalogError::Domain(DomainError::Validation(msg)) => {
            json_error(StatusCode::BAD_REQUEST, msg.clone())
        }
        CatalogError::Domain(DomainError::InvalidId(_)) => {
            json_error(StatusCode::BAD_REQUEST, "invalid product id")
        }
        CatalogError::Domain(DomainError::NotFound) => {
            json_error(StatusCode::NOT_FOUND, "product not found")
        }
        CatalogError::Repository(_) => json_error(StatusCode::INTERNAL_SERVER_ERROR, fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(res: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unparsable_id_maps_to_bad_request() {
        let err = CatalogError::from("abc".parse::<catalog_core::ProductId>().unwrap_err());

        let res = catalog_error_to_response(&err, "failed to delete product");

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(res).await, json!({ "error": "invalid product id" }));
    }

    #[tokio::test]
    async fn store_failure_hides_details_behind_fallback() {
        let err = CatalogError::Repository("connection refused".into());

        let res = catalog_error_to_response(&err, "failed to create product");

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(res).await, json!({ "error": "failed to create product" }));
    }
}
