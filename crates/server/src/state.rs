use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use embedding::EmbeddingService;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Embedding pipeline (shared across requests)
    pub service: Arc<EmbeddingService>,

    /// Prometheus renderer, present when metrics are enabled and a recorder was installed
    pub metrics: Option<PrometheusHandle>,

    pub started_at: Instant,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        service: Arc<EmbeddingService>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            service,
            metrics,
            started_at: Instant::now(),
        }
    }

    /// Validate the embedding config and build the service it describes.
    pub fn from_config(
        config: ServerConfig,
        metrics: Option<PrometheusHandle>,
    ) -> ServerResult<Self> {
        let service = EmbeddingService::from_config(config.embedding.clone())
            .map_err(|e| ServerError::Config(e.to_string()))?;
        Ok(Self::new(config, Arc::new(service), metrics))
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
