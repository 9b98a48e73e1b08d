//! Embedding generation pipeline.
//!
//! Turns text into dense vectors through an external provider, then post-processes them
//! (dimension check, optional L2 normalization) and optionally compares two of them with
//! cosine similarity.
//!
//! Pieces, bottom-up:
//!
//! - [`TextEmbedder`] - one text in, one raw vector out. [`HttpEmbedder`] talks to Gemini or
//!   an OpenAI-compatible endpoint; [`StubEmbedder`] is a deterministic offline stand-in.
//! - [`post_process`] - length check against the requested dimensionality, then normalization.
//! - [`BatchOrchestrator`] - per-text calls with bounded concurrency and order-preserving
//!   reassembly. Transient provider failures are retried per [`RetryConfig`].
//! - [`cosine_similarity`] - score in `[-1, 1]`.
//! - [`EmbeddingService`] - validates requests and composes the above.
//!
//! Batches never fail wholesale because one item did: each item reports its own vector or
//! its own error. Single-text and similarity requests fail as a whole.
//!
//! ## Quick example
//!
//! ```no_run
//! use embedding::{EmbedRequest, EmbeddingConfig, EmbeddingService, ProviderConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), embedding::EmbeddingError> {
//!     let cfg = EmbeddingConfig {
//!         provider: ProviderConfig::stub(),
//!         ..Default::default()
//!     };
//!     let service = EmbeddingService::from_config(cfg)?;
//!
//!     let resp = service.embed(EmbedRequest::new("The quick brown fox")).await?;
//!     assert_eq!(resp.dimension, 768);
//!     Ok(())
//! }
//! ```
//!
//! ## Env vars to know
//!
//! The library itself never reads the environment except through
//! [`EmbeddingConfig::with_env_api_key`], which looks at `GOOGLE_AI_API_KEY` (Gemini) or
//! `OPENAI_API_KEY` (OpenAI) when no key is configured.

mod batch;
mod client;
mod config;
mod error;
mod normalize;
mod provider;
mod retry;
mod serde_millis;
mod service;
mod similarity;
mod stub;
mod types;
mod validate;

pub use crate::batch::{BatchOrchestrator, ItemOutcome};
pub use crate::client::HttpEmbedder;
pub use crate::config::{EmbeddingConfig, ProviderConfig, ProviderKind};
pub use crate::error::{EmbeddingError, ValidationError};
pub use crate::normalize::post_process;
pub use crate::provider::{build_embedder, TextEmbedder};
pub use crate::retry::{execute_with_retry_async, RetryConfig, RetryResult};
pub use crate::service::EmbeddingService;
pub use crate::similarity::cosine_similarity;
pub use crate::stub::StubEmbedder;
pub use crate::types::{
    BatchEmbedRequest, BatchEmbedResponse, BatchItemResult, EmbedRequest, EmbedResponse,
    EmbeddingVector, SimilarityRequest, SimilarityResponse,
};
pub use crate::validate::{resolve_dimensions, validate_batch, validate_text};
