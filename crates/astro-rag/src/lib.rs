//! astro-rag: space-science question answering with retrieval and general-knowledge fallback
//!
//! A CSV dataset is turned into documents, chunked, embedded and cached as an
//! on-disk cosine index. Each question passes a domain gate, retrieves the
//! top chunks, and is answered from them when they are relevant; otherwise the
//! model answers from general knowledge. Answers are served whole or streamed
//! as sentence fragments over HTTP.

pub mod config;
pub mod domain;
pub mod error;
pub mod generation;
pub mod index;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use generation::AnswerOrchestrator;
pub use index::{IndexCacheManager, VectorIndex};
pub use server::RagServer;
pub use types::{
    document::{Chunk, Document, Record},
    query::GenerateRequest,
    response::{AnswerResult, ResponseType},
};
