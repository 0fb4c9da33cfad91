//! RAG server binary
//!
//! Run with: cargo run -p medreport-rag --bin medreport-rag-server

use std::path::PathBuf;

use medreport_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medreport_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration (MEDREPORT_CONFIG points at a TOML file)
    let config_path = std::env::var("MEDREPORT_CONFIG").ok().map(PathBuf::from);
    let config = RagConfig::load(config_path.as_deref())?;
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - Embedding dimensions: {}", config.embeddings.dimensions);
    tracing::info!("  - LLM model: {}", config.llm.generate_model);
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);
    tracing::info!("  - Collections: {}", config.index.storage_dir.display());

    // Check Ollama
    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    let client = reqwest::Client::new();
    match client
        .get(format!("{}/api/tags", config.llm.base_url))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Ollama is running");
        }
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.base_url);
            tracing::warn!("Start it with: ollama serve");
            tracing::warn!(
                "Then pull models: ollama pull {} && ollama pull {}",
                config.embeddings.model,
                config.llm.generate_model
            );
        }
    }

    let server = RagServer::new(config)?;
    tracing::info!("API: http://{}/api", server.address());
    tracing::info!("Health: http://{}/health", server.address());

    server.start().await?;

    Ok(())
}
