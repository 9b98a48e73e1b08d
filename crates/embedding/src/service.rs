use std::sync::Arc;

use crate::batch::BatchOrchestrator;
use crate::config::EmbeddingConfig;
use crate::provider::{build_embedder, TextEmbedder};
use crate::similarity::cosine_similarity;
use crate::types::{
    BatchEmbedRequest, BatchEmbedResponse, BatchItemResult, EmbedRequest, EmbedResponse,
    EmbeddingVector, SimilarityRequest, SimilarityResponse,
};
use crate::validate::{resolve_dimensions, validate_batch, validate_text};
use crate::{EmbeddingError, ValidationError};

/// The only entry point callers need.
///
/// Holds the immutable configuration and the provider, validates every request before any
/// I/O, and composes the pipeline for single, batch and similarity use cases. Cheap to share
/// behind an `Arc`; holds no per-request state.
pub struct EmbeddingService {
    config: EmbeddingConfig,
    embedder: Arc<dyn TextEmbedder>,
    orchestrator: BatchOrchestrator,
}

impl EmbeddingService {
    /// Wire a service around an already-built provider.
    pub fn new(config: EmbeddingConfig, embedder: Arc<dyn TextEmbedder>) -> Self {
        let orchestrator = BatchOrchestrator::new(
            embedder.clone(),
            config.max_batch_size,
            config.max_in_flight,
            config.retry,
        );
        Self {
            config,
            embedder,
            orchestrator,
        }
    }

    /// Validate `config` and build the provider it names.
    pub fn from_config(config: EmbeddingConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;
        let embedder = build_embedder(&config.provider)?;
        tracing::info!(
            provider = embedder.provider_name(),
            model = embedder.model_name(),
            default_dimensions = config.default_dimensions,
            max_batch_size = config.max_batch_size,
            max_in_flight = config.max_in_flight,
            "embedding service ready"
        );
        Ok(Self::new(config, embedder))
    }

    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }

    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    pub fn provider_name(&self) -> &str {
        self.embedder.provider_name()
    }

    /// Embed one text. Any failure fails the whole request.
    pub async fn embed(&self, request: EmbedRequest) -> Result<EmbedResponse, EmbeddingError> {
        validate_text(&request.text)?;
        let dimensions = resolve_dimensions(request.dimensions, &self.config)?;

        let vector = self
            .embed_single(request.text.clone(), dimensions, request.normalize)
            .await?;

        Ok(EmbedResponse {
            dimension: vector.dimension(),
            text: request.text,
            vector,
            normalized: request.normalize,
            model: self.model_name().to_string(),
        })
    }

    /// Embed several texts, reporting success or failure per item in input order.
    pub async fn embed_batch(
        &self,
        request: BatchEmbedRequest,
    ) -> Result<BatchEmbedResponse, EmbeddingError> {
        validate_batch(&request.texts, self.config.max_batch_size)?;
        let dimensions = resolve_dimensions(request.dimensions, &self.config)?;

        let outcomes = self
            .orchestrator
            .run(&request.texts, dimensions, request.normalize)
            .await?;

        let results: Vec<BatchItemResult> = outcomes
            .into_iter()
            .enumerate()
            .map(|(index, outcome)| BatchItemResult::from_outcome(index, outcome))
            .collect();
        let failed_count = results.iter().filter(|r| !r.is_ok()).count();

        Ok(BatchEmbedResponse {
            count: results.len(),
            failed_count,
            results,
            normalized: request.normalize,
            model: self.model_name().to_string(),
        })
    }

    /// Embed both texts concurrently and score them with cosine similarity.
    ///
    /// Both embeddings must succeed; when both fail, the first text's error is reported.
    pub async fn similarity(
        &self,
        request: SimilarityRequest,
    ) -> Result<SimilarityResponse, EmbeddingError> {
        if request.text1.trim().is_empty() {
            return Err(ValidationError::EmptyTextAt { index: 0 }.into());
        }
        if request.text2.trim().is_empty() {
            return Err(ValidationError::EmptyTextAt { index: 1 }.into());
        }
        let dimensions = resolve_dimensions(request.dimensions, &self.config)?;

        let (first, second) = tokio::join!(
            self.embed_single(request.text1.clone(), dimensions, request.normalize),
            self.embed_single(request.text2.clone(), dimensions, request.normalize),
        );
        let (embedding1, embedding2) = (first?, second?);

        let score = cosine_similarity(&embedding1, &embedding2, request.normalize)?;

        Ok(SimilarityResponse {
            score,
            metric: "cosine".to_string(),
            text1: request.text1,
            text2: request.text2,
            embedding1,
            embedding2,
        })
    }

    /// Length-1 batch through the orchestrator, unwrapped back to a single outcome.
    async fn embed_single(
        &self,
        text: String,
        dimensions: usize,
        normalize: bool,
    ) -> Result<EmbeddingVector, EmbeddingError> {
        let texts = [text];
        self.orchestrator
            .run(&texts, dimensions, normalize)
            .await?
            .pop()
            .unwrap_or_else(|| {
                Err(EmbeddingError::ProviderInternalError(
                    "batch returned no result".into(),
                ))
            })
    }
}
