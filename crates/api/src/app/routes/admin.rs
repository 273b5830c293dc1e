//! Operational endpoints.

use std::sync::Arc;

use axum::{Json, Router, extract::Extension, response::IntoResponse, routing::post};

use crate::app::{errors, services::AppServices};

pub fn router() -> Router {
    Router::new().route("/reload", post(reload_catalog))
}

/// Re-read the configured snapshot and replace the catalog.
///
/// On failure the previous catalog keeps serving and the error is returned.
pub async fn reload_catalog(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.reload().await {
        Ok(info) => Json(info).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "catalog reload rejected");
            errors::reload_error_to_response(e)
        }
    }
}
