//! Application state for the RAG server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::generation::RagPipeline;
use crate::ingestion::DocumentProcessor;
use crate::learning::RatingStore;
use crate::providers::{
    self, EmbeddingProvider, InMemoryVectorStore, LlmProvider, OllamaEmbedder, VectorStoreProvider,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Query pipeline
    pipeline: RagPipeline,
    /// Upload processing and document management
    processor: DocumentProcessor,
    /// Answer ratings
    ratings: RatingStore,
    /// Embedding provider
    embedding_provider: Arc<dyn EmbeddingProvider>,
    /// LLM provider (Ollama or OpenAI)
    llm_provider: Arc<dyn LlmProvider>,
}

impl AppState {
    /// Create state with providers built from configuration
    pub async fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing RAG application state (LLM backend: {:?})...", config.llm.backend);

        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(OllamaEmbedder::new(&config.embeddings)?);
        tracing::info!("Embedding provider: {} ({})", embedder.name(), config.embeddings.model);

        let store: Arc<dyn VectorStoreProvider> = match &config.storage.index_path {
            Some(path) => Arc::new(InMemoryVectorStore::open(path)?),
            None => Arc::new(InMemoryVectorStore::new()),
        };
        tracing::info!("Vector store initialized ({} chunks)", store.len().await?);

        let llm = providers::create_llm(&config.llm)?;

        Ok(Self::with_providers(config, embedder, store, llm))
    }

    /// Create state over explicit providers
    pub fn with_providers(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        let pipeline = RagPipeline::new(&config, embedder.clone(), store.clone(), llm.clone());
        let processor = DocumentProcessor::new(&config.chunking, embedder.clone(), store);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                processor,
                ratings: RatingStore::new(),
                embedding_provider: embedder,
                llm_provider: llm,
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get query pipeline
    pub fn pipeline(&self) -> &RagPipeline {
        &self.inner.pipeline
    }

    /// Get document processor
    pub fn processor(&self) -> &DocumentProcessor {
        &self.inner.processor
    }

    /// Get rating store
    pub fn ratings(&self) -> &RatingStore {
        &self.inner.ratings
    }

    /// Whether both model backends answer their health checks
    pub async fn is_ready(&self) -> bool {
        let embedding_ok = self.inner.embedding_provider.health_check().await.unwrap_or(false);
        let llm_ok = self.inner.llm_provider.health_check().await.unwrap_or(false);
        embedding_ok && llm_ok
    }
}
