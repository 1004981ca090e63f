//! Semantic search over the vector index

use std::sync::Arc;

use crate::error::Result;
use crate::providers::{EmbeddingProvider, VectorStoreProvider};
use crate::types::RetrievedChunk;

/// Embeds a query and returns the nearest chunks
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
}

impl Retriever {
    /// Create a retriever over shared providers
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStoreProvider>) -> Self {
        Self { embedder, store }
    }

    /// Top-k chunks for a query, most similar first
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedChunk>> {
        let embedding = self.embedder.embed(query).await?;
        let matches = self.store.query(&embedding, top_k).await?;

        tracing::debug!("Retrieved {} chunks (top_k = {})", matches.len(), top_k);

        Ok(matches
            .into_iter()
            .map(|m| RetrievedChunk::from_distance(m.id, m.document, &m.metadata, m.distance))
            .collect())
    }
}
