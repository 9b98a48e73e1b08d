use async_trait::async_trait;
use fxhash::hash64;

use crate::provider::TextEmbedder;
use crate::EmbeddingError;

/// Deterministic offline provider.
///
/// Generates sinusoid values derived from a hash of the input text, so the same text and
/// dimensionality always give the same raw vector. Values are not normalized; the pipeline
/// handles that like it would for a remote provider.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    model: String,
}

impl StubEmbedder {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self::new("stub-embedding")
    }
}

#[async_trait]
impl TextEmbedder for StubEmbedder {
    async fn embed(&self, text: &str, dimensions: usize) -> Result<Vec<f64>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::ProviderRejectedInput(
                "text is empty after trimming".into(),
            ));
        }
        Ok(stub_vector(text, dimensions))
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        "stub"
    }
}

pub(crate) fn stub_vector(text: &str, dimensions: usize) -> Vec<f64> {
    let h = hash64(text.as_bytes());
    (0..dimensions)
        .map(|idx| {
            let shifted = (h >> (idx % 32)) as f64;
            (shifted * 0.0001 + idx as f64).sin()
        })
        .collect()
}
