use serde::{Deserialize, Serialize};

use crate::EmbeddingError;

/// Final embedding values handed back to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct EmbeddingVector(Vec<f64>);

impl EmbeddingVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Number of components.
    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

fn default_true() -> bool {
    true
}

/// Single-text embedding request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EmbedRequest {
    /// The text to embed.
    pub text: String,
    /// Scale the vector to unit length (recommended for similarity tasks).
    #[serde(default = "default_true")]
    pub normalize: bool,
    /// Output dimensionality; the configured default applies when absent.
    #[serde(default)]
    pub dimensions: Option<usize>,
}

impl EmbedRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            normalize: true,
            dimensions: None,
        }
    }
}

/// Multi-text embedding request sharing one set of parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BatchEmbedRequest {
    pub texts: Vec<String>,
    #[serde(default = "default_true")]
    pub normalize: bool,
    #[serde(default)]
    pub dimensions: Option<usize>,
}

impl BatchEmbedRequest {
    pub fn new<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            texts: texts.into_iter().map(Into::into).collect(),
            normalize: true,
            dimensions: None,
        }
    }
}

/// Request to score the similarity of two texts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SimilarityRequest {
    pub text1: String,
    pub text2: String,
    #[serde(default = "default_true")]
    pub normalize: bool,
    #[serde(default)]
    pub dimensions: Option<usize>,
}

impl SimilarityRequest {
    pub fn new(text1: impl Into<String>, text2: impl Into<String>) -> Self {
        Self {
            text1: text1.into(),
            text2: text2.into(),
            normalize: true,
            dimensions: None,
        }
    }
}

/// Response for a single embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedResponse {
    pub text: String,
    pub vector: EmbeddingVector,
    pub dimension: usize,
    pub normalized: bool,
    pub model: String,
}

/// Outcome for one text of a batch, tagged by `status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchItemResult {
    Ok {
        index: usize,
        vector: EmbeddingVector,
        dimension: usize,
    },
    Error {
        index: usize,
        kind: String,
        message: String,
    },
}

impl BatchItemResult {
    pub(crate) fn from_outcome(index: usize, outcome: Result<EmbeddingVector, EmbeddingError>) -> Self {
        match outcome {
            Ok(vector) => BatchItemResult::Ok {
                index,
                dimension: vector.dimension(),
                vector,
            },
            Err(err) => BatchItemResult::Error {
                index,
                kind: err.kind().to_string(),
                message: err.to_string(),
            },
        }
    }

    pub fn index(&self) -> usize {
        match self {
            BatchItemResult::Ok { index, .. } | BatchItemResult::Error { index, .. } => *index,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, BatchItemResult::Ok { .. })
    }

    pub fn vector(&self) -> Option<&EmbeddingVector> {
        match self {
            BatchItemResult::Ok { vector, .. } => Some(vector),
            BatchItemResult::Error { .. } => None,
        }
    }
}

/// Response for a batch; `results[i]` always corresponds to `texts[i]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchEmbedResponse {
    pub results: Vec<BatchItemResult>,
    pub count: usize,
    pub failed_count: usize,
    pub normalized: bool,
    pub model: String,
}

/// Response for a similarity request. `score` is always a cosine similarity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarityResponse {
    pub score: f64,
    pub metric: String,
    pub text1: String,
    pub text2: String,
    pub embedding1: EmbeddingVector,
    pub embedding2: EmbeddingVector,
}
