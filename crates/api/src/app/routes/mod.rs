use axum::{routing::get, Router};

pub mod products;
pub mod system;

pub fn router() -> Router {
    Router::new()
        .route("/healthz", get(system::healthz))
        .route("/metrics", get(system::metrics))
        .nest("/products", products::router())
}
