//! Workspace umbrella crate for embedgen.
//!
//! Re-exports the embedding pipeline so callers depend on one crate, and (with the default
//! `server` feature) the HTTP server that exposes it.
//!
//! ```no_run
//! use embedgen::{BatchEmbedRequest, EmbeddingConfig, EmbeddingService, ProviderConfig};
//!
//! # async fn run() -> Result<(), embedgen::EmbeddingError> {
//! let service = EmbeddingService::from_config(EmbeddingConfig {
//!     provider: ProviderConfig::stub(),
//!     ..Default::default()
//! })?;
//!
//! let batch = service
//!     .embed_batch(BatchEmbedRequest::new(["first text", "second text"]))
//!     .await?;
//! assert_eq!(batch.count, 2);
//! # Ok(())
//! # }
//! ```

pub use embedding::{
    BatchEmbedRequest, BatchEmbedResponse, BatchItemResult, BatchOrchestrator, EmbedRequest,
    EmbedResponse, EmbeddingConfig, EmbeddingError, EmbeddingService, EmbeddingVector,
    HttpEmbedder, ItemOutcome, ProviderConfig, ProviderKind, RetryConfig, RetryResult,
    SimilarityRequest, SimilarityResponse, StubEmbedder, TextEmbedder, ValidationError,
    build_embedder, cosine_similarity, execute_with_retry_async, post_process,
    resolve_dimensions, validate_batch, validate_text,
};

#[cfg(feature = "server")]
pub use server::{ServerConfig, ServerError, ServerState, build_router, start_server};
