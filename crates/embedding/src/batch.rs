use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;

use crate::normalize::post_process;
use crate::provider::TextEmbedder;
use crate::retry::{execute_with_retry_async, RetryConfig};
use crate::types::EmbeddingVector;
use crate::{EmbeddingError, ValidationError};

/// Outcome for one text of a batch, in input order.
pub type ItemOutcome = Result<EmbeddingVector, EmbeddingError>;

/// Fans a batch of texts out to the provider with bounded concurrency.
///
/// Each text gets its own provider call (wrapped in the retry policy) followed by
/// post-processing. Results come back in input order regardless of completion order, and a
/// failing item never takes down its siblings.
pub struct BatchOrchestrator {
    embedder: Arc<dyn TextEmbedder>,
    max_batch_size: usize,
    max_in_flight: usize,
    retry: RetryConfig,
}

impl BatchOrchestrator {
    pub fn new(
        embedder: Arc<dyn TextEmbedder>,
        max_batch_size: usize,
        max_in_flight: usize,
        retry: RetryConfig,
    ) -> Self {
        Self {
            embedder,
            max_batch_size,
            max_in_flight: max_in_flight.max(1),
            retry,
        }
    }

    /// Embed every text at `dimensions`.
    ///
    /// Only an oversized batch fails as a whole (before any provider call); everything else is
    /// reported per item.
    pub async fn run(
        &self,
        texts: &[String],
        dimensions: usize,
        normalize: bool,
    ) -> Result<Vec<ItemOutcome>, EmbeddingError> {
        if texts.len() > self.max_batch_size {
            return Err(ValidationError::BatchTooLarge {
                len: texts.len(),
                max: self.max_batch_size,
            }
            .into());
        }

        let start = Instant::now();
        let concurrency = self.max_in_flight.min(texts.len()).max(1);

        let mut indexed: Vec<(usize, ItemOutcome)> =
            stream::iter((0..texts.len()).map(|idx| {
                let text = texts[idx].as_str();
                async move { (idx, self.embed_one(idx, text, dimensions, normalize).await) }
            }))
            .buffer_unordered(concurrency)
            .collect()
            .await;

        // Completion order is arbitrary; put results back where their texts were.
        indexed.sort_unstable_by_key(|(idx, _)| *idx);
        let outcomes: Vec<ItemOutcome> = indexed.into_iter().map(|(_, outcome)| outcome).collect();

        let failed = outcomes.iter().filter(|o| o.is_err()).count();
        let duration_ms = start.elapsed().as_millis() as u64;
        // Single embeds and similarity sides run as one-item batches.
        if outcomes.len() == 1 {
            tracing::debug!(failed, dimensions, normalize, duration_ms, "text embedded");
        } else {
            tracing::info!(
                count = outcomes.len(),
                failed,
                dimensions,
                normalize,
                concurrency,
                duration_ms,
                "batch embedded"
            );
        }

        Ok(outcomes)
    }

    async fn embed_one(
        &self,
        index: usize,
        text: &str,
        dimensions: usize,
        normalize: bool,
    ) -> ItemOutcome {
        let embedder = &self.embedder;
        let retried =
            execute_with_retry_async(&self.retry, move |_| embedder.embed(text, dimensions)).await;
        let attempts = retried.attempts;
        let retry_ms = retried.total_duration.as_millis() as u64;

        let outcome = retried
            .into_result()
            .and_then(|raw| post_process(raw, dimensions, normalize));

        if let Err(err) = &outcome {
            tracing::warn!(
                index,
                attempts,
                retry_ms,
                kind = err.kind(),
                error = %err,
                text_len = text.len(),
                "batch item failed"
            );
        }
        outcome
    }
}
