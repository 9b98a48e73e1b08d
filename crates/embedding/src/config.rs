use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::retry::RetryConfig;
use crate::EmbeddingError;

/// Which remote (or local stub) provider generates the raw vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini `embedContent`.
    #[default]
    Gemini,
    /// OpenAI-compatible `/embeddings` endpoint.
    OpenAi,
    /// Deterministic hash-based vectors, no network. For local development and tests.
    Stub,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Stub => "stub",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-embedding-001",
            ProviderKind::OpenAi => "text-embedding-3-small",
            ProviderKind::Stub => "stub-embedding",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com",
            ProviderKind::OpenAi => "https://api.openai.com/v1",
            ProviderKind::Stub => "",
        }
    }

    /// Environment variable consulted when no credential is configured explicitly.
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            ProviderKind::Gemini => Some("GOOGLE_AI_API_KEY"),
            ProviderKind::OpenAi => Some("OPENAI_API_KEY"),
            ProviderKind::Stub => None,
        }
    }
}

/// Connection settings for the embedding provider.
#[derive(Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    /// Credential sent in a request header. Never serialized back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model identifier; the provider's default applies when absent.
    pub model: Option<String>,
    /// Override of the provider base URL (useful for proxies and tests).
    pub base_url: Option<String>,
    /// Overall request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl ProviderConfig {
    pub fn stub() -> Self {
        Self {
            kind: ProviderKind::Stub,
            ..Default::default()
        }
    }

    pub fn model_name(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.kind.default_model())
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.kind.default_base_url())
            .trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(30))
    }
}

// Hand-written so the credential never reaches logs through `{:?}`.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Process-wide, read-only pipeline configuration.
///
/// Built once at startup and handed to [`EmbeddingService`](crate::EmbeddingService); nothing
/// in the pipeline reads the environment on its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: ProviderConfig,
    /// Dimensionality used when a request does not specify one.
    pub default_dimensions: usize,
    /// Smallest dimensionality the provider accepts.
    pub min_dimensions: usize,
    /// Largest dimensionality the provider accepts.
    pub max_dimensions: usize,
    /// Cap on texts per batch request.
    pub max_batch_size: usize,
    /// Maximum concurrent provider calls per batch.
    pub max_in_flight: usize,
    /// Retry policy for transient provider failures.
    pub retry: RetryConfig,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            default_dimensions: 768,
            min_dimensions: 128,
            max_dimensions: 3072,
            max_batch_size: 100,
            max_in_flight: 8,
            retry: RetryConfig::default(),
        }
    }
}

impl EmbeddingConfig {
    /// Fill in the credential from the provider's conventional env var when none is set.
    pub fn with_env_api_key(mut self) -> Self {
        if self.provider.api_key.is_none() {
            if let Some(var) = self.provider.kind.api_key_env() {
                self.provider.api_key = std::env::var(var).ok().filter(|k| !k.trim().is_empty());
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.provider.kind != ProviderKind::Stub
            && self
                .provider
                .api_key
                .as_deref()
                .map_or(true, |k| k.trim().is_empty())
        {
            return Err(EmbeddingError::InvalidConfig(format!(
                "an API key is required for the {} provider",
                self.provider.kind.as_str()
            )));
        }
        if self.min_dimensions == 0 || self.min_dimensions > self.max_dimensions {
            return Err(EmbeddingError::InvalidConfig(format!(
                "dimension bounds are inconsistent: min {} max {}",
                self.min_dimensions, self.max_dimensions
            )));
        }
        if !(self.min_dimensions..=self.max_dimensions).contains(&self.default_dimensions) {
            return Err(EmbeddingError::InvalidConfig(format!(
                "default dimensions must be between {} and {}",
                self.min_dimensions, self.max_dimensions
            )));
        }
        if self.max_batch_size == 0 {
            return Err(EmbeddingError::InvalidConfig(
                "max_batch_size must be positive".into(),
            ));
        }
        if self.max_in_flight == 0 {
            return Err(EmbeddingError::InvalidConfig(
                "max_in_flight must be positive".into(),
            ));
        }
        Ok(())
    }
}
