//! Embedgen Server - HTTP REST API for text embeddings
//!
//! Exposes the `embedding` pipeline over HTTP:
//!
//! - **Embedding**: single texts and order-preserving batches with per-item failures
//! - **Similarity**: cosine similarity between two texts
//! - **Health & Metrics**: liveness/readiness probes and Prometheus metrics
//!
//! # Features
//!
//! - **Middleware**: Compression, CORS, request ID tracking, structured logging, timeouts
//! - **Configuration**: `.env`, optional `server.toml` and `EMBEDGEN__*` environment variables
//! - **Error Handling**: `{"error": {"code", "message"}}` bodies with stable codes
//! - **Graceful Shutdown**: Ctrl+C and SIGTERM
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics
//! - `POST /embed` - Embed one text
//! - `POST /embed/batch` - Embed many texts
//! - `POST /similarity` - Compare two texts

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{LogFormat, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
