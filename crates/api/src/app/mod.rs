//! HTTP application wiring (axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: store selection and the `AppServices` facade
//! - `routes.rs`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs and JSON mapping
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// e2e tests).
pub fn build_app(services: Arc<services::AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .merge(routes::router())
        .layer(Extension(services))
}
