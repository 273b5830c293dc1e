use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    response::IntoResponse,
    routing::get,
};

use storefront_catalog::Product;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// Mounted under `/products`. Every segment after it is a product id, so no
/// other fixed routes live here.
pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products))
        .route("/:id", get(get_product))
}

pub async fn list_products(Extension(services): Extension<Arc<AppServices>>) -> Json<Vec<Product>> {
    Json(services.catalog().list())
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.catalog().get(&id) {
        Ok(product) => Json(product).into_response(),
        Err(e) => errors::not_found_to_response(e),
    }
}

pub async fn search_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::SearchParams>,
) -> Json<Vec<Product>> {
    Json(services.catalog().search(&params.q))
}
