use crate::state::ServerState;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// Health check endpoint (liveness)
/// Returns 200 if server is running
pub async fn health_check(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": state.config.app_name,
        "model": state.service.model_name(),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": state.uptime_seconds(),
    }))
}

/// Readiness check endpoint
///
/// The state only exists once the embedding config has validated and the provider client has
/// been built, so reaching this handler means the service can take traffic.
pub async fn readiness_check(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let embedding = state.service.config();
    Json(json!({
        "status": "ready",
        "service": state.config.app_name,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": state.uptime_seconds(),
        "components": {
            "provider": state.service.provider_name(),
            "model": state.service.model_name(),
            "default_dimensions": embedding.default_dimensions,
            "max_batch_size": embedding.max_batch_size,
        }
    }))
}

/// Prometheus metrics endpoint
///
/// Renders the Prometheus text format when a recorder is installed; falls back to a JSON
/// uptime report otherwise.
pub async fn metrics(State(state): State<Arc<ServerState>>) -> Response {
    match (&state.metrics, state.config.metrics_enabled) {
        (Some(handle), true) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        _ => Json(json!({
            "uptime_seconds": state.uptime_seconds(),
        }))
        .into_response(),
    }
}
