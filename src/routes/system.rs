use axum::{http::StatusCode, routing::get, Extension, Json, Router};
use serde::Serialize;

use crate::runner::{Extension as ExtractRunner, Health};

pub fn handler() -> Router {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    status: &'static str,
}

/// Liveness probe.
///
/// The model loads before the listener binds, so a serving process always
/// reports healthy; the unavailable branch only covers the drain window
/// during shutdown.
#[allow(clippy::unused_async)]
async fn health(Extension(runner): ExtractRunner) -> (StatusCode, Json<HealthStatus>) {
    match runner.health() {
        Health::Ready | Health::Busy => (StatusCode::OK, Json(HealthStatus { status: "healthy" })),
        Health::Starting | Health::SetupFailed => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthStatus {
                status: "unavailable",
            }),
        ),
    }
}
