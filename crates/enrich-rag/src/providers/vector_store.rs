//! Vector store provider trait for storing and searching embeddings

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::ChunkMetadata;

/// A stored (vector, text, metadata) triple
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Chunk identifier, `"{doc_id}_chunk_{i}"`
    pub id: String,
    /// Embedding vector
    pub embedding: Vec<f32>,
    /// Chunk text
    pub document: String,
    /// Chunk metadata
    pub metadata: ChunkMetadata,
}

/// One nearest-neighbor match
#[derive(Debug, Clone)]
pub struct VectorMatch {
    pub id: String,
    pub document: String,
    pub metadata: ChunkMetadata,
    /// Cosine distance (0.0 = identical direction)
    pub distance: f32,
}

/// Metadata filter for `get`
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    /// Only records of this file
    pub filename: Option<String>,
}

impl RecordFilter {
    /// Match every record
    pub fn all() -> Self {
        Self::default()
    }

    /// Match records of one file
    pub fn by_filename(filename: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
        }
    }

    /// Whether a record passes this filter
    pub fn matches(&self, metadata: &ChunkMetadata) -> bool {
        match &self.filename {
            Some(name) => &metadata.filename == name,
            None => true,
        }
    }
}

/// Trait for vector storage and similarity search
///
/// Implementations:
/// - `InMemoryVectorStore`: exact cosine search with optional JSON snapshot
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Insert or replace records
    async fn add(&self, records: Vec<VectorRecord>) -> Result<()>;

    /// Nearest `k` records, ascending cosine distance
    async fn query(&self, embedding: &[f32], k: usize) -> Result<Vec<VectorMatch>>;

    /// All records passing the filter (embeddings omitted)
    async fn get(&self, filter: &RecordFilter) -> Result<Vec<VectorRecord>>;

    /// Delete records by id, returning how many existed
    async fn delete(&self, ids: &[String]) -> Result<usize>;

    /// Get total number of vectors stored
    async fn len(&self) -> Result<usize>;

    /// Check if store is empty
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Check if the provider is healthy
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
