use thiserror::Error;

/// Client-fault problems detected before any provider call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A single-text request carried an empty (or whitespace-only) text.
    #[error("text cannot be empty")]
    EmptyText,
    /// One text inside a batch or similarity request is empty.
    #[error("text at index {index} cannot be empty")]
    EmptyTextAt { index: usize },
    /// A batch request carried no texts at all.
    #[error("texts list cannot be empty")]
    EmptyBatch,
    /// A batch request exceeded the configured cap.
    #[error("batch size {len} exceeds the maximum of {max} texts")]
    BatchTooLarge { len: usize, max: usize },
    /// Requested output dimensionality is outside the supported range.
    #[error("dimensions must be between {min} and {max}, got {requested}")]
    DimensionsOutOfRange {
        requested: usize,
        min: usize,
        max: usize,
    },
}

/// Errors surfaced by the embedding pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmbeddingError {
    /// The request failed validation; no provider call was attempted.
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),
    /// Network or transport failure talking to the provider.
    #[error("embedding provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// The provider answered with a quota or rate-limit response.
    #[error("embedding provider rate limit exceeded: {0}")]
    ProviderRateLimited(String),
    /// The provider refused the text or the requested dimensionality.
    #[error("embedding provider rejected input: {0}")]
    ProviderRejectedInput(String),
    /// Any other non-success answer from the provider.
    #[error("embedding provider error: {0}")]
    ProviderInternalError(String),
    /// The provider returned a vector of the wrong length, or two vectors differ in length.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// A zero (or non-finite) vector cannot be normalized or compared.
    #[error("degenerate vector: norm is zero or not finite")]
    DegenerateVector,
    /// Configuration is inconsistent (e.g., remote provider without a credential).
    #[error("invalid embedding config: {0}")]
    InvalidConfig(String),
}

impl EmbeddingError {
    /// Stable machine-readable identifier of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            EmbeddingError::Validation(ValidationError::BatchTooLarge { .. }) => "batch_too_large",
            EmbeddingError::Validation(_) => "validation_error",
            EmbeddingError::ProviderUnavailable(_) => "provider_unavailable",
            EmbeddingError::ProviderRateLimited(_) => "provider_rate_limited",
            EmbeddingError::ProviderRejectedInput(_) => "provider_rejected_input",
            EmbeddingError::ProviderInternalError(_) => "provider_internal_error",
            EmbeddingError::DimensionMismatch { .. } => "dimension_mismatch",
            EmbeddingError::DegenerateVector => "degenerate_vector",
            EmbeddingError::InvalidConfig(_) => "invalid_config",
        }
    }

    /// Transient provider failures; the only ones the retry policy acts on.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            EmbeddingError::ProviderUnavailable(_) | EmbeddingError::ProviderRateLimited(_)
        )
    }

    /// True when the caller is at fault (bad request), false for provider and server faults.
    pub fn is_client_fault(&self) -> bool {
        matches!(self, EmbeddingError::Validation(_))
    }
}
