//! Shared test double: a provider that records every call and can be told to misbehave.

#![allow(dead_code)]

use async_trait::async_trait;
use embedgen::{
    EmbeddingConfig, EmbeddingError, EmbeddingService, ProviderConfig, RetryConfig,
    StubEmbedder, TextEmbedder,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type LatencyFn = Arc<dyn Fn(&str) -> Duration + Send + Sync>;

enum Behavior {
    Fail(EmbeddingError),
    /// Fail this many more times, then behave normally.
    FailTimes(usize, EmbeddingError),
    Zero,
    WrongLength(usize),
}

/// Deterministic provider (values from [`StubEmbedder`]) with a call log, in-flight
/// tracking, per-text latency and per-text failure injection.
pub struct RecordingEmbedder {
    inner: StubEmbedder,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    latency: Option<LatencyFn>,
    behaviors: Mutex<HashMap<String, Behavior>>,
}

impl RecordingEmbedder {
    pub fn new() -> Self {
        Self {
            inner: StubEmbedder::new("recording-model"),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            latency: None,
            behaviors: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_latency(mut self, f: impl Fn(&str) -> Duration + Send + Sync + 'static) -> Self {
        self.latency = Some(Arc::new(f));
        self
    }

    pub fn fail_on(self, text: &str, error: EmbeddingError) -> Self {
        self.set(text, Behavior::Fail(error))
    }

    pub fn fail_times(self, text: &str, times: usize, error: EmbeddingError) -> Self {
        self.set(text, Behavior::FailTimes(times, error))
    }

    pub fn zero_on(self, text: &str) -> Self {
        self.set(text, Behavior::Zero)
    }

    pub fn wrong_length_on(self, text: &str, len: usize) -> Self {
        self.set(text, Behavior::WrongLength(len))
    }

    fn set(self, text: &str, behavior: Behavior) -> Self {
        self.behaviors
            .lock()
            .unwrap()
            .insert(text.to_string(), behavior);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn max_observed_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Raw values this provider returns for `text` when it behaves normally.
    pub async fn raw(&self, text: &str, dimensions: usize) -> Vec<f64> {
        self.inner.embed(text, dimensions).await.unwrap()
    }

    fn injected(&self, text: &str, dimensions: usize) -> Option<Result<Vec<f64>, EmbeddingError>> {
        let mut behaviors = self.behaviors.lock().unwrap();
        match behaviors.get_mut(text)? {
            Behavior::Fail(err) => Some(Err(err.clone())),
            Behavior::FailTimes(remaining, err) => {
                if *remaining == 0 {
                    None
                } else {
                    *remaining -= 1;
                    Some(Err(err.clone()))
                }
            }
            Behavior::Zero => Some(Ok(vec![0.0; dimensions])),
            Behavior::WrongLength(len) => Some(Ok(vec![1.0; *len])),
        }
    }
}

#[async_trait]
impl TextEmbedder for RecordingEmbedder {
    async fn embed(&self, text: &str, dimensions: usize) -> Result<Vec<f64>, EmbeddingError> {
        self.calls.lock().unwrap().push(text.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(latency) = &self.latency {
            tokio::time::sleep(latency(text)).await;
        }

        let result = match self.injected(text, dimensions) {
            Some(result) => result,
            None => self.inner.embed(text, dimensions).await,
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    fn provider_name(&self) -> &str {
        "recording"
    }
}

/// Retry policy with no real waiting.
pub fn fast_retry(max_retries: u32) -> RetryConfig {
    RetryConfig::default()
        .with_max_retries(max_retries)
        .with_base_delay(Duration::from_millis(1))
        .with_max_delay(Duration::from_millis(2))
        .with_jitter(false)
}

pub fn test_config() -> EmbeddingConfig {
    EmbeddingConfig {
        provider: ProviderConfig::stub(),
        retry: RetryConfig::disabled(),
        ..Default::default()
    }
}

pub fn service_with(embedder: Arc<RecordingEmbedder>, config: EmbeddingConfig) -> EmbeddingService {
    EmbeddingService::new(config, embedder)
}

pub fn l2_norm(values: &[f64]) -> f64 {
    values.iter().map(|x| x * x).sum::<f64>().sqrt()
}
