//! Provider abstractions for embeddings and text generation
//!
//! Trait-based so the index builder and the answer pipeline can run against
//! Ollama, Gemini, or in-process stubs.

pub mod embedding;
pub mod gemini;
pub mod llm;
pub mod ollama;
mod retry;

use std::sync::Arc;

use crate::config::{GenerationBackend, RagConfig};
use crate::error::Result;

pub use embedding::EmbeddingProvider;
pub use gemini::GeminiClient;
pub use llm::GenerationProvider;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaLlm};

/// Build the generation provider selected by `llm.backend`
pub fn generation_from_config(config: &RagConfig) -> Result<Arc<dyn GenerationProvider>> {
    match config.llm.backend {
        GenerationBackend::Gemini => {
            tracing::info!("Using Gemini generation backend ({})", config.llm.model);
            Ok(Arc::new(GeminiClient::new(&config.llm)?))
        }
        GenerationBackend::Ollama => {
            tracing::info!("Using Ollama generation backend ({})", config.llm.model);
            Ok(Arc::new(OllamaLlm::new(&config.llm)?))
        }
    }
}

/// Build the embedding provider (always Ollama)
pub fn embedding_from_config(config: &RagConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    Ok(Arc::new(OllamaEmbedder::new(&config.embeddings)?))
}
