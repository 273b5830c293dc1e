use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use storefront_catalog::{LoadError, NotFoundError};

use crate::app::services::ReloadError;

pub fn not_found_to_response(err: NotFoundError) -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
}

pub fn reload_error_to_response(err: ReloadError) -> axum::response::Response {
    match err {
        ReloadError::Load(e @ LoadError::IoFailure { .. }) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "snapshot_unreadable", e.to_string())
        }
        ReloadError::Load(e @ LoadError::MalformedData(_)) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "malformed_snapshot", e.to_string())
        }
        ReloadError::Task(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "reload_failed", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
