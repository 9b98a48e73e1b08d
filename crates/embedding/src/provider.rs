use async_trait::async_trait;
use std::sync::Arc;

use crate::client::HttpEmbedder;
use crate::config::{ProviderConfig, ProviderKind};
use crate::stub::StubEmbedder;
use crate::EmbeddingError;

/// The provider boundary: one text in, one raw vector (or a classified failure) out.
///
/// Implementations must not retry and must not alter the provider's values. The requested
/// `dimensions` is forwarded to the provider as a generation parameter.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    async fn embed(&self, text: &str, dimensions: usize) -> Result<Vec<f64>, EmbeddingError>;

    /// Model identifier reported back to callers.
    fn model_name(&self) -> &str;

    /// Short provider label used in logs and health output.
    fn provider_name(&self) -> &str;
}

/// Build the concrete embedder selected by `cfg.kind`.
pub fn build_embedder(cfg: &ProviderConfig) -> Result<Arc<dyn TextEmbedder>, EmbeddingError> {
    match cfg.kind {
        ProviderKind::Stub => Ok(Arc::new(StubEmbedder::new(cfg.model_name()))),
        ProviderKind::Gemini | ProviderKind::OpenAi => Ok(Arc::new(HttpEmbedder::new(cfg)?)),
    }
}
