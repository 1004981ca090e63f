//! Document ingestion: text extraction, chunking, and indexing

mod chunker;
mod parser;
mod processor;

pub use chunker::TextChunker;
pub use parser::FileParser;
pub use processor::DocumentProcessor;
