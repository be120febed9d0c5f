//! Retrieval: top-k chunk lookup and the lexical relevance check on its result

pub mod relevance;
mod retriever;

pub use relevance::{is_relevant, overlap_ratio};
pub use retriever::{RetrievedChunk, Retriever, VectorRetriever};
