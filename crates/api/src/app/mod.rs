//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: the shared catalog store and snapshot reloading
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// The store inside `services` must already hold the initial catalog.
pub fn build_app(services: Arc<services::AppServices>) -> Router {
    routes::router().layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(Extension(services)),
    )
}
