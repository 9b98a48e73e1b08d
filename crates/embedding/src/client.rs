use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::config::{ProviderConfig, ProviderKind};
use crate::provider::TextEmbedder;
use crate::EmbeddingError;

/// Longest provider error detail carried into our own messages.
const MAX_DETAIL_CHARS: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ApiProviderKind {
    Gemini,
    OpenAi,
}

/// Remote embedding provider reached over HTTPS.
///
/// One instance owns one pooled `reqwest::Client`; share it behind an `Arc` across requests.
pub struct HttpEmbedder {
    provider: ApiProviderKind,
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl HttpEmbedder {
    pub fn new(cfg: &ProviderConfig) -> Result<Self, EmbeddingError> {
        let provider = match cfg.kind {
            ProviderKind::Gemini => ApiProviderKind::Gemini,
            ProviderKind::OpenAi => ApiProviderKind::OpenAi,
            ProviderKind::Stub => {
                return Err(EmbeddingError::InvalidConfig(
                    "the stub provider does not use HTTP".into(),
                ))
            }
        };
        let api_key = cfg
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                EmbeddingError::InvalidConfig(format!(
                    "an API key is required for the {} provider",
                    cfg.kind.as_str()
                ))
            })?
            .to_string();

        let http = reqwest::Client::builder()
            .timeout(cfg.timeout())
            .connect_timeout(std::time::Duration::from_secs(10))
            .pool_max_idle_per_host(32)
            .build()
            .map_err(|e| EmbeddingError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            provider,
            http,
            base_url: cfg.base_url().to_string(),
            model: cfg.model_name().to_string(),
            api_key,
        })
    }

    /// Model name without the `models/` prefix Gemini sometimes uses.
    fn api_model_name(&self) -> &str {
        self.model.strip_prefix("models/").unwrap_or(&self.model)
    }

    fn endpoint(&self) -> String {
        match self.provider {
            ApiProviderKind::Gemini => format!(
                "{}/v1beta/models/{}:embedContent",
                self.base_url,
                self.api_model_name()
            ),
            ApiProviderKind::OpenAi => format!("{}/embeddings", self.base_url),
        }
    }

    fn build_payload(&self, text: &str, dimensions: usize) -> Value {
        match self.provider {
            ApiProviderKind::Gemini => json!({
                "model": format!("models/{}", self.api_model_name()),
                "content": { "parts": [{ "text": text }] },
                "outputDimensionality": dimensions,
            }),
            ApiProviderKind::OpenAi => json!({
                "input": text,
                "model": self.model,
                "dimensions": dimensions,
            }),
        }
    }

    async fn send(&self, payload: Value) -> Result<Value, EmbeddingError> {
        let request = self.http.post(self.endpoint()).json(&payload);
        let request = match self.provider {
            ApiProviderKind::Gemini => request.header("x-goog-api-key", &self.api_key),
            ApiProviderKind::OpenAi => request.bearer_auth(&self.api_key),
        };

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                EmbeddingError::ProviderUnavailable("request to embedding provider timed out".into())
            } else {
                EmbeddingError::ProviderUnavailable(format!(
                    "HTTP request failed: {}",
                    e.without_url()
                ))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, provider_error_detail(&body)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| EmbeddingError::ProviderInternalError(format!("invalid JSON response: {e}")))
    }
}

#[async_trait]
impl TextEmbedder for HttpEmbedder {
    async fn embed(&self, text: &str, dimensions: usize) -> Result<Vec<f64>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::ProviderRejectedInput(
                "text is empty after trimming".into(),
            ));
        }

        tracing::debug!(
            provider = self.provider_name(),
            model = %self.model,
            text_len = text.len(),
            dimensions,
            "requesting embedding"
        );

        let response = self.send(self.build_payload(text, dimensions)).await?;
        parse_embedding_from_value(response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        match self.provider {
            ApiProviderKind::Gemini => "gemini",
            ApiProviderKind::OpenAi => "openai",
        }
    }
}

/// Map a non-success HTTP status onto the failure taxonomy.
fn classify_status(status: StatusCode, detail: String) -> EmbeddingError {
    let message = if detail.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("HTTP {}: {detail}", status.as_u16())
    };

    match status.as_u16() {
        429 => EmbeddingError::ProviderRateLimited(message),
        400 | 404 | 413 | 422 => EmbeddingError::ProviderRejectedInput(message),
        502..=504 => EmbeddingError::ProviderUnavailable(message),
        _ => EmbeddingError::ProviderInternalError(message),
    }
}

/// Pull `error.message` out of a provider error body, truncated. Anything else is dropped so
/// raw bodies (which may echo request headers) never reach our callers.
fn provider_error_detail(body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_default();
    message.chars().take(MAX_DETAIL_CHARS).collect()
}

fn parse_embedding_from_value(value: Value) -> Result<Vec<f64>, EmbeddingError> {
    match value {
        Value::Object(mut map) => {
            // Gemini: {"embedding": {"values": [...]}}
            if let Some(embedding) = map.remove("embedding") {
                return match embedding {
                    Value::Object(mut inner) => inner
                        .remove("values")
                        .ok_or_else(|| {
                            EmbeddingError::ProviderInternalError(
                                "missing `values` in `embedding` object".into(),
                            )
                        })
                        .and_then(parse_embedding_vector),
                    other => parse_embedding_vector(other),
                };
            }

            // OpenAI: {"data": [{"embedding": [...]}]}
            if let Some(Value::Array(items)) = map.remove("data") {
                return match items.into_iter().next() {
                    Some(Value::Object(mut obj)) => obj
                        .remove("embedding")
                        .ok_or_else(|| {
                            EmbeddingError::ProviderInternalError(
                                "missing `embedding` field in data item".into(),
                            )
                        })
                        .and_then(parse_embedding_vector),
                    Some(_) => Err(EmbeddingError::ProviderInternalError(
                        "unexpected entry inside `data` array".into(),
                    )),
                    None => Err(EmbeddingError::ProviderInternalError(
                        "API response did not contain embeddings".into(),
                    )),
                };
            }

            Err(EmbeddingError::ProviderInternalError(
                "unsupported API response shape".into(),
            ))
        }
        other => parse_embedding_vector(other),
    }
}

fn parse_embedding_vector(value: Value) -> Result<Vec<f64>, EmbeddingError> {
    match value {
        Value::Array(values) => values
            .into_iter()
            .map(|entry| match entry {
                Value::Number(num) => num.as_f64().ok_or_else(|| {
                    EmbeddingError::ProviderInternalError("non-finite embedding value".into())
                }),
                other => Err(EmbeddingError::ProviderInternalError(format!(
                    "embedding entries must be numbers, got {}",
                    json_type(&other)
                ))),
            })
            .collect(),
        other => Err(EmbeddingError::ProviderInternalError(format!(
            "embedding vector must be an array, got {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
