//! Provider abstractions for embeddings, LLM completion, and vector storage
//!
//! Trait objects let the pipeline run against a local Ollama server, an
//! OpenAI-compatible API, or test doubles without code changes.

pub mod embedding;
pub mod llm;
pub mod memory;
pub mod ollama;
pub mod openai;
pub mod vector_store;

use std::sync::Arc;

use crate::config::{LlmBackend, LlmConfig};
use crate::error::Result;

pub use embedding::EmbeddingProvider;
pub use llm::{CompletionOptions, LlmProvider};
pub use memory::InMemoryVectorStore;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaLlm};
pub use openai::OpenAiLlm;
pub use vector_store::{RecordFilter, VectorMatch, VectorRecord, VectorStoreProvider};

/// Build the configured LLM backend
pub fn create_llm(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>> {
    let llm: Arc<dyn LlmProvider> = match config.backend {
        LlmBackend::Ollama => Arc::new(OllamaLlm::new(config)?),
        LlmBackend::OpenAi => Arc::new(OpenAiLlm::new(config)?),
    };
    tracing::info!("LLM provider: {} ({})", llm.name(), llm.model());
    Ok(llm)
}
