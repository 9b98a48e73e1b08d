//! Embedgen Server - HTTP REST API for text embeddings
//!
//! Reads configuration from `.env`, `server.toml` and `EMBEDGEN__*` variables, then serves
//! until interrupted.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    server::start_server(config).await?;
    Ok(())
}
