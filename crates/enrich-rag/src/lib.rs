//! enrich-rag: knowledge-base question answering with completeness scoring
//!
//! Documents are chunked, embedded, and indexed for semantic search. Each
//! query retrieves the closest chunks, asks a language model for a grounded
//! answer with a self-assessment, has a second model pass review how complete
//! that answer is, and suggests which documents would fill the gaps.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod learning;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use generation::RagPipeline;
pub use types::{SearchRequest, SearchResponse};
