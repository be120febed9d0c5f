//! In-process cosine-similarity index over embedded chunks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Chunk;

/// Bumped whenever the serialized layout changes; older artifacts are rebuilt.
const FORMAT_VERSION: u32 = 1;

/// A chunk with its unit-normalized embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedChunk {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// Search result with chunk and similarity
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity (-1.0 to 1.0, higher is more similar)
    pub similarity: f32,
}

/// Chunks plus embeddings, searched by brute-force cosine similarity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    format_version: u32,
    embedding_model: String,
    dimensions: usize,
    built_at: DateTime<Utc>,
    entries: Vec<IndexedChunk>,
}

impl VectorIndex {
    /// Create an empty index for the given embedding model
    pub fn new(embedding_model: impl Into<String>, dimensions: usize) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            embedding_model: embedding_model.into(),
            dimensions,
            built_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    /// Build an index from chunks and their embeddings (same order)
    pub fn build(
        embedding_model: impl Into<String>,
        dimensions: usize,
        chunks: Vec<Chunk>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self> {
        if chunks.len() != embeddings.len() {
            return Err(Error::internal(format!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }

        let mut index = Self::new(embedding_model, dimensions);
        index.entries.reserve(chunks.len());
        for (chunk, embedding) in chunks.into_iter().zip(embeddings) {
            index.insert(chunk, embedding)?;
        }
        Ok(index)
    }

    /// Insert a chunk with its embedding
    pub fn insert(&mut self, chunk: Chunk, mut embedding: Vec<f32>) -> Result<()> {
        if embedding.len() != self.dimensions {
            return Err(Error::embedding(format!(
                "Embedding has {} dimensions, index expects {}",
                embedding.len(),
                self.dimensions
            )));
        }
        normalize(&mut embedding);
        self.entries.push(IndexedChunk { chunk, embedding });
        Ok(())
    }

    /// Top `k` chunks by cosine similarity, best first (ties keep insertion order)
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if query.len() != self.dimensions {
            return Err(Error::Retrieval(format!(
                "Query has {} dimensions, index expects {}",
                query.len(),
                self.dimensions
            )));
        }
        if k == 0 || self.entries.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = query.to_vec();
        normalize(&mut query);

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, dot(&query, &entry.embedding)))
            .collect();

        let by_score = |a: &(usize, f32), b: &(usize, f32)| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0));
        if scored.len() > k {
            scored.select_nth_unstable_by(k - 1, by_score);
            scored.truncate(k);
        }
        scored.sort_by(by_score);

        Ok(scored
            .into_iter()
            .map(|(i, similarity)| SearchHit {
                chunk: self.entries[i].chunk.clone(),
                similarity,
            })
            .collect())
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no chunks
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding model the index was built with
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// Embedding dimensions
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Build time
    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Persist atomically to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = bincode::serde::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| Error::internal(format!("Failed to encode index: {}", e)))?;
        super::write_atomic(path, &bytes)?;
        tracing::debug!("Wrote {} bytes of index to {}", bytes.len(), path.display());
        Ok(())
    }

    /// Load from `path`; any failure is reported as `IndexLoad`
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::index_load(format!("{}: {}", path.display(), e)))?;

        let (index, _): (Self, usize) =
            bincode::serde::decode_from_slice(&bytes, bincode::config::standard())
                .map_err(|e| Error::index_load(format!("{}: {}", path.display(), e)))?;

        if index.format_version != FORMAT_VERSION {
            return Err(Error::index_load(format!(
                "format version {} (expected {})",
                index.format_version, FORMAT_VERSION
            )));
        }
        Ok(index)
    }
}

fn normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
