//! API route handlers
//!
//! Routes are organized by functionality:
//!
//! - `health`: Health checks, readiness, and metrics
//! - `embed`: Single and batch embedding
//! - `similarity`: Cosine similarity between two texts

pub mod embed;
pub mod health;
pub mod similarity;

use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// API version and base info
///
/// Returns server information including version, available endpoints and the active model.
///
/// # Response
///
/// ```json
/// {
///   "name": "embedgen",
///   "version": "0.1.0",
///   "endpoints": ["..."],
///   "model": "gemini-embedding-001",
///   "default_dimensions": 768
/// }
/// ```
pub async fn api_info(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    let embedding = state.service.config();
    Ok(Json(json!({
        "name": state.config.app_name,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "embed": "POST /embed",
            "embed_batch": "POST /embed/batch",
            "similarity": "POST /similarity",
            "health": "GET /health",
            "ready": "GET /ready",
            "metrics": "GET /metrics"
        },
        "provider": state.service.provider_name(),
        "model": state.service.model_name(),
        "default_dimensions": embedding.default_dimensions,
        "max_dimensions": embedding.max_dimensions,
        "max_batch_size": embedding.max_batch_size,
    })))
}

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
