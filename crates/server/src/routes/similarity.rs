use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use embedding::{SimilarityRequest, SimilarityResponse};
use std::sync::Arc;

/// Cosine similarity between two texts, with both embeddings echoed back.
pub async fn compare_texts(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<SimilarityRequest>, JsonRejection>,
) -> ServerResult<Json<SimilarityResponse>> {
    let Json(request) = payload?;
    tracing::debug!(
        text1_len = request.text1.len(),
        text2_len = request.text2.len(),
        normalize = request.normalize,
        "similarity request"
    );

    let response = state.service.similarity(request).await?;
    tracing::debug!(score = response.score, "similarity computed");
    Ok(Json(response))
}
