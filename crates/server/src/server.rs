//! Server initialization and routing
//!
//! This module handles the Axum server setup including:
//! - Router configuration with all API endpoints
//! - Middleware stack (request ids, logging, metrics, compression, etc.)
//! - Graceful shutdown handling

use crate::config::{LogFormat, ServerConfig};
use crate::middleware::{log_requests, request_id, track_metrics};
use crate::routes::{api_info, not_found};
use crate::routes::{embed, health, similarity};
use crate::state::ServerState;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Build the Axum router with all routes and middleware
///
/// Middleware stack (outermost first):
/// 1. Tracing spans
/// 2. Request logging
/// 3. Request ID tracking
/// 4. CORS (when enabled)
/// 5. Compression
/// 6. Timeout handling
/// 7. Body size limit and per-route metrics
pub fn build_router(state: Arc<ServerState>) -> Router {
    let api_routes = Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics))
        .route("/embed", post(embed::embed_text))
        .route("/embed/batch", post(embed::embed_batch))
        .route("/similarity", post(similarity::compare_texts))
        .route_layer(from_fn(track_metrics))
        .layer(DefaultBodyLimit::max(state.config.max_body_size()));

    let router = Router::new()
        .merge(api_routes)
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.timeout(),
        ))
        .layer(CompressionLayer::new());

    let router = if state.config.enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router
        .layer(from_fn(request_id))
        .layer(from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the embedding HTTP server
///
/// Initializes logging and metrics, builds the embedding service from `config.embedding`
/// and listens until SIGTERM or Ctrl+C. Refuses to start when the embedding config is
/// invalid (for example a remote provider without an API key).
///
/// # Example
///
/// ```rust,no_run
/// use server::ServerConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::load()?;
///     server::start_server(config).await?;
///     Ok(())
/// }
/// ```
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    init_tracing(&config);

    let metrics = if config.metrics_enabled {
        Some(install_metrics_recorder()?)
    } else {
        None
    };

    let state = Arc::new(ServerState::from_config(config.clone(), metrics)?);
    let app = build_router(state);

    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!(
        addr = %addr,
        provider = config.embedding.provider.kind.as_str(),
        model = config.embedding.provider.model_name(),
        "Starting {}",
        config.app_name
    );
    tracing::info!(
        "Timeout: {}s, Max body: {}MB",
        config.timeout_secs,
        config.max_body_size_mb
    );
    tracing::info!(
        "Max batch size: {}, max in flight: {}, retries: {}",
        config.embedding.max_batch_size,
        config.embedding.max_in_flight,
        config.embedding.retry.max_retries
    );
    tracing::info!(
        "CORS: {}, Metrics: {}",
        config.enable_cors,
        config.metrics_enabled
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    // A subscriber may already be installed (tests, embedding in another binary).
    let _ = match config.log_format {
        LogFormat::Json => builder
            .with_thread_ids(true)
            .with_thread_names(true)
            .json()
            .try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}

fn install_metrics_recorder() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    metrics::describe_counter!("embedgen_requests_total", "HTTP requests by endpoint and status");
    metrics::describe_histogram!(
        "embedgen_request_duration_seconds",
        metrics::Unit::Seconds,
        "HTTP request latency by endpoint"
    );
    metrics::describe_counter!(
        "embedgen_batch_items_failed_total",
        "Batch items that ended in an error marker"
    );
    Ok(handle)
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
