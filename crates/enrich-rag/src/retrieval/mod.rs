//! Retrieval of relevant chunks for a query

mod search;

pub use search::Retriever;
