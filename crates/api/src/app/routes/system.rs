use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode};

use storefront_catalog::CatalogInfo;

use crate::app::services::AppServices;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Generation, size and load time of the catalog being served.
pub async fn catalog_info(Extension(services): Extension<Arc<AppServices>>) -> Json<CatalogInfo> {
    Json(services.catalog().info())
}
