use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use embedding::{BatchEmbedRequest, BatchEmbedResponse, EmbedRequest, EmbedResponse};
use std::sync::Arc;

/// Embed a single text.
///
/// Any failure fails the whole request.
pub async fn embed_text(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<EmbedRequest>, JsonRejection>,
) -> ServerResult<Json<EmbedResponse>> {
    let Json(request) = payload?;
    tracing::debug!(
        text_len = request.text.len(),
        dimensions = ?request.dimensions,
        normalize = request.normalize,
        "embed request"
    );

    let response = state.service.embed(request).await?;
    Ok(Json(response))
}

/// Embed a batch of texts.
///
/// Provider failures are reported per item; the request itself only fails on validation
/// (empty list, blank text, oversized batch, bad dimensions).
pub async fn embed_batch(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<BatchEmbedRequest>, JsonRejection>,
) -> ServerResult<Json<BatchEmbedResponse>> {
    let Json(request) = payload?;
    tracing::debug!(
        count = request.texts.len(),
        dimensions = ?request.dimensions,
        normalize = request.normalize,
        "batch embed request"
    );

    let response = state.service.embed_batch(request).await?;
    if response.failed_count > 0 {
        metrics::counter!("embedgen_batch_items_failed_total")
            .increment(response.failed_count as u64);
        tracing::warn!(
            count = response.count,
            failed = response.failed_count,
            "batch completed with failed items"
        );
    }

    Ok(Json(response))
}
