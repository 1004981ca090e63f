//! Core types for the RAG system

pub mod document;
pub mod query;
pub mod response;

pub use document::{ChunkMetadata, DocumentMetadata, ProcessingStatus, RetrievedChunk};
pub use query::{AnswerRating, SearchRequest};
pub use response::{
    ConfidenceLevel, Effort, EnrichmentSuggestion, MissingInfoItem, MissingInfoKind, SearchResponse,
    SourceRef,
};
