use axum::{Router, routing::get};

pub mod admin;
pub mod products;
pub mod system;

/// Router for all catalog endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/catalog", get(system::catalog_info))
        .route("/search", get(products::search_products))
        .nest("/products", products::router())
        .nest("/admin", admin::router())
}
