//! Ingestion pipeline orchestration: extract, chunk, embed, index

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, RecordFilter, VectorRecord, VectorStoreProvider};
use crate::types::{ChunkMetadata, DocumentMetadata, ProcessingStatus};

use super::chunker::TextChunker;
use super::parser::FileParser;

/// Turns uploaded files into indexed chunks and manages indexed documents
pub struct DocumentProcessor {
    chunker: TextChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
}

impl DocumentProcessor {
    /// Create a new processor over shared providers
    pub fn new(
        chunking: &ChunkingConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
    ) -> Self {
        Self {
            chunker: TextChunker::new(chunking.chunk_size, chunking.chunk_overlap),
            embedder,
            store,
        }
    }

    /// Process and index one upload
    ///
    /// Failures are reported in the returned metadata rather than as an error.
    pub async fn process_document(
        &self,
        filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> DocumentMetadata {
        let content_type = FileParser::resolve_content_type(filename, content_type);
        let start = Instant::now();

        match self.ingest(filename, &content_type, data).await {
            Ok(metadata) => {
                tracing::info!(
                    "Indexed {} ({} chunks) in {:?}",
                    filename,
                    metadata.chunk_count,
                    start.elapsed()
                );
                metadata
            }
            Err(e) => {
                tracing::warn!("Failed to process {}: {}", filename, e);
                DocumentMetadata::failed(filename, &content_type, e.to_string())
            }
        }
    }

    async fn ingest(&self, filename: &str, content_type: &str, data: &[u8]) -> Result<DocumentMetadata> {
        let text = extract_off_runtime(filename, content_type, data).await?;
        if text.trim().is_empty() {
            return Err(Error::file_parse(filename, "No text content found in the document"));
        }

        let chunks = self.chunker.split(&text);
        let embeddings = self.embedder.embed_batch(&chunks).await?;
        if embeddings.len() != chunks.len() {
            return Err(Error::embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let doc_id = Uuid::new_v4();
        let upload_date = Utc::now();
        let content_hash = hash_content(&text);
        let total_chunks = chunks.len() as u32;

        let records: Vec<VectorRecord> = chunks
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(i, (document, embedding))| VectorRecord {
                id: format!("{}_chunk_{}", doc_id, i),
                embedding,
                document,
                metadata: ChunkMetadata {
                    filename: filename.to_string(),
                    chunk_index: i as u32,
                    total_chunks,
                    upload_date,
                    content_type: content_type.to_string(),
                    file_size: data.len() as u64,
                    content_hash: content_hash.clone(),
                },
            })
            .collect();

        self.store.add(records).await?;

        Ok(DocumentMetadata {
            filename: filename.to_string(),
            upload_date,
            file_size: data.len() as u64,
            content_type: content_type.to_string(),
            chunk_count: total_chunks,
            processing_status: ProcessingStatus::Completed,
        })
    }

    /// All indexed documents, one entry per filename
    pub async fn list_documents(&self) -> Result<Vec<DocumentMetadata>> {
        let records = self.store.get(&RecordFilter::all()).await?;

        let mut documents: BTreeMap<String, DocumentMetadata> = BTreeMap::new();
        for record in records {
            let meta = record.metadata;
            documents
                .entry(meta.filename.clone())
                .or_insert_with(|| DocumentMetadata {
                    filename: meta.filename.clone(),
                    upload_date: meta.upload_date,
                    file_size: meta.file_size,
                    content_type: meta.content_type.clone(),
                    chunk_count: 0,
                    processing_status: ProcessingStatus::Completed,
                })
                .chunk_count += 1;
        }

        Ok(documents.into_values().collect())
    }

    /// Delete every chunk of a file, returning how many were removed
    pub async fn delete_document(&self, filename: &str) -> Result<usize> {
        let ids: Vec<String> = self
            .store
            .get(&RecordFilter::by_filename(filename))
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect();

        if ids.is_empty() {
            return Err(Error::DocumentNotFound(filename.to_string()));
        }

        let removed = self.store.delete(&ids).await?;
        tracing::info!("Deleted {} chunks of {}", removed, filename);
        Ok(removed)
    }

    /// Total number of indexed chunks
    pub async fn chunk_count(&self) -> Result<usize> {
        self.store.len().await
    }
}

/// Hash content for deduplication
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Text extraction is blocking and CPU-bound, so it runs on the blocking pool
async fn extract_off_runtime(filename: &str, content_type: &str, data: &[u8]) -> Result<String> {
    let filename = filename.to_string();
    let content_type = content_type.to_string();
    let data = data.to_vec();
    tokio::task::spawn_blocking(move || FileParser::extract(&filename, &content_type, &data))
        .await
        .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
}
