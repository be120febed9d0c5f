//! Core types for the RAG service

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, Document, Record};
pub use query::GenerateRequest;
pub use response::{AnswerResult, RejectionBody, ResponseType};
