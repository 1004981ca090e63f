//! RAG Server binary
//!
//! Run with: cargo run -p enrich-rag --bin enrich-rag-server

use enrich_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "enrich_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RagConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - LLM: {:?} / {}", config.llm.backend, config.llm.model);
    tracing::info!("  - Chunk size: {} (overlap {})", config.chunking.chunk_size, config.chunking.chunk_overlap);
    tracing::info!("  - Top k: {}", config.retrieval.top_k);
    match &config.storage.index_path {
        Some(path) => tracing::info!("  - Index snapshot: {}", path.display()),
        None => tracing::info!("  - Index snapshot: disabled"),
    }

    let server = RagServer::new(config).await?;

    if !server.is_ready().await {
        tracing::warn!("Model backends not reachable yet; /ready will report 503");
        tracing::warn!("For a local setup: ollama serve && ollama pull nomic-embed-text && ollama pull llama3.2:3b");
    }

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/info", server.address());
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
