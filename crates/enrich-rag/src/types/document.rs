//! Document, chunk and retrieval types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata stored alongside every chunk in the vector index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Original filename of the uploaded document
    pub filename: String,
    /// Position of this chunk within the document (0-based)
    pub chunk_index: u32,
    /// Number of chunks the document was split into
    pub total_chunks: u32,
    /// When the document was ingested
    pub upload_date: DateTime<Utc>,
    /// Declared or detected MIME type
    pub content_type: String,
    /// Size of the uploaded file in bytes
    #[serde(default)]
    pub file_size: u64,
    /// SHA-256 of the extracted text
    #[serde(default)]
    pub content_hash: String,
}

/// A chunk returned by similarity search; lives for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Chunk identifier in the vector index
    pub id: String,
    /// Chunk text
    pub content: String,
    /// Cosine similarity (0.0-1.0, higher is better)
    pub similarity_score: f32,
    /// Source filename
    pub filename: String,
    /// Chunk position within its document
    pub chunk_index: u32,
}

impl RetrievedChunk {
    /// Build from an index match, converting cosine distance to similarity
    pub fn from_distance(
        id: String,
        content: String,
        metadata: &ChunkMetadata,
        distance: f32,
    ) -> Self {
        Self {
            id,
            content,
            similarity_score: (1.0 - distance).clamp(0.0, 1.0),
            filename: metadata.filename.clone(),
            chunk_index: metadata.chunk_index,
        }
    }
}

/// Outcome of processing an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "error")]
pub enum ProcessingStatus {
    /// Text extracted, chunked and indexed
    Completed,
    /// Processing stopped with an error message
    Failed(String),
}

/// Per-document summary reported by uploads and listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Original filename
    pub filename: String,
    /// Ingestion time
    pub upload_date: DateTime<Utc>,
    /// File size in bytes
    pub file_size: u64,
    /// MIME type used for extraction
    pub content_type: String,
    /// Number of indexed chunks
    pub chunk_count: u32,
    /// Processing outcome
    pub processing_status: ProcessingStatus,
}

impl DocumentMetadata {
    /// Metadata for an upload that could not be processed
    pub fn failed(filename: &str, content_type: &str, error: impl Into<String>) -> Self {
        Self {
            filename: filename.to_string(),
            upload_date: Utc::now(),
            file_size: 0,
            content_type: content_type.to_string(),
            chunk_count: 0,
            processing_status: ProcessingStatus::Failed(error.into()),
        }
    }

    /// Whether the document made it into the index
    pub fn is_completed(&self) -> bool {
        self.processing_status == ProcessingStatus::Completed
    }
}
