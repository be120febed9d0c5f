//! Retriever trait and the vector-index implementation

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::index::VectorIndex;
use crate::providers::EmbeddingProvider;

/// A chunk returned for a query
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    /// Chunk text
    pub text: String,
    /// Cosine similarity to the query
    pub similarity: f32,
}

/// Top-k passage lookup for a query
#[async_trait]
pub trait Retriever: Send + Sync {
    /// The `k` chunks most similar to `query`, best first
    async fn top_k(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>>;

    /// Name for logging
    fn name(&self) -> &str;
}

/// Embeds the query and searches a loaded `VectorIndex`
pub struct VectorRetriever {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl VectorRetriever {
    pub fn new(index: Arc<VectorIndex>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { index, embedder }
    }

    /// The index being searched
    pub fn index(&self) -> &VectorIndex {
        &self.index
    }
}

#[async_trait]
impl Retriever for VectorRetriever {
    async fn top_k(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
        let embedding = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| Error::Retrieval(format!("Query embedding failed: {}", e)))?;

        let index = Arc::clone(&self.index);
        let hits = tokio::task::spawn_blocking(move || index.search(&embedding, k))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

        tracing::debug!("Retrieved {} chunks for query", hits.len());

        Ok(hits
            .into_iter()
            .map(|hit| RetrievedChunk {
                text: hit.chunk.text,
                similarity: hit.similarity,
            })
            .collect())
    }

    fn name(&self) -> &str {
        "vector"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::HashEmbedder;
    use crate::types::Chunk;

    async fn retriever(texts: &[&str]) -> VectorRetriever {
        let embedder = Arc::new(HashEmbedder::new(64));
        let chunks: Vec<Chunk> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new(i, 0, *t))
            .collect();
        let owned: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        let embeddings = embedder.embed_batch(&owned).await.unwrap();
        let index = VectorIndex::build(embedder.model(), 64, chunks, embeddings).unwrap();
        VectorRetriever::new(Arc::new(index), embedder)
    }

    #[tokio::test]
    async fn test_exact_text_ranks_first() {
        let retriever = retriever(&[
            "planet: Mars moons: Phobos Deimos",
            "planet: Jupiter moons: Io Europa",
            "star: Sirius type: A1V",
        ])
        .await;

        let hits = retriever.top_k("planet: Jupiter moons: Io Europa", 2).await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].text, "planet: Jupiter moons: Io Europa");
        assert!(hits[0].similarity >= hits[1].similarity);
    }

    #[tokio::test]
    async fn test_k_larger_than_index() {
        let retriever = retriever(&["only chunk"]).await;

        let hits = retriever.top_k("anything", 4).await.unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(retriever.index().len(), 1);
    }
}
