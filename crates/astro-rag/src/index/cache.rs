//! Index cache manager: decides between loading the persisted index and rebuilding it
//!
//! The cached index is valid only when the artifact is present and loadable and
//! the fingerprint stored beside it equals the dataset's current fingerprint.
//! The fingerprint file is written strictly after the artifact, so a crash
//! between the two writes leaves the cache looking stale, never falsely valid.

use chrono::{DateTime, SecondsFormat, Utc};
use futures::{StreamExt, TryStreamExt};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{CacheConfig, RagConfig};
use crate::error::{Error, Result};
use crate::ingestion::{to_documents, RecordSource, RecursiveChunker};
use crate::providers::EmbeddingProvider;
use crate::types::Chunk;

use super::{write_atomic, VectorIndex};

/// Texts sent per `embed_batch` call while building
const EMBED_BATCH_SIZE: usize = 32;

/// Dataset staleness marker derived from its last-modified time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint for a modification timestamp
    pub fn from_timestamp(modified: DateTime<Utc>) -> Self {
        Self(modified.to_rfc3339_opts(SecondsFormat::Nanos, true))
    }

    /// Wrap a stored fingerprint value
    pub fn from_stored(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    /// Fingerprint text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why the cached index cannot be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildReason {
    /// No persisted index artifact
    MissingIndex,
    /// Dataset fingerprint cannot be computed
    FingerprintUnavailable,
    /// No stored fingerprint next to the artifact
    MissingFingerprint,
    /// Stored fingerprint exists but cannot be read
    FingerprintUnreadable(String),
    /// Dataset changed since the index was built
    FingerprintChanged { stored: String, current: String },
}

impl fmt::Display for RebuildReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingIndex => write!(f, "no cached index found"),
            Self::FingerprintUnavailable => write!(f, "cannot access dataset fingerprint"),
            Self::MissingFingerprint => write!(f, "no fingerprint file found"),
            Self::FingerprintUnreadable(e) => write!(f, "error reading fingerprint file: {}", e),
            Self::FingerprintChanged { stored, current } => {
                write!(f, "dataset changed ({} -> {})", stored, current)
            }
        }
    }
}

/// Owns the index's on-disk lifecycle
pub struct IndexCacheManager {
    index_path: PathBuf,
    fingerprint_path: PathBuf,
    cache_dir: PathBuf,
    prefix: String,
    source: Arc<dyn RecordSource>,
    embedder: Arc<dyn EmbeddingProvider>,
    chunker: RecursiveChunker,
    embed_concurrency: usize,
}

impl IndexCacheManager {
    /// Create a manager for the given cache layout and collaborators
    pub fn new(
        cache: &CacheConfig,
        prefix: impl Into<String>,
        source: Arc<dyn RecordSource>,
        embedder: Arc<dyn EmbeddingProvider>,
        chunker: RecursiveChunker,
    ) -> Self {
        Self {
            index_path: cache.index_path(),
            fingerprint_path: cache.fingerprint_path(),
            cache_dir: cache.dir.clone(),
            prefix: prefix.into(),
            source,
            embedder,
            chunker,
            embed_concurrency: 4,
        }
    }

    /// Create from the service configuration
    pub fn from_config(
        config: &RagConfig,
        source: Arc<dyn RecordSource>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        let chunker = RecursiveChunker::from_config(&config.chunking)?;
        Ok(Self::new(&config.cache, &config.dataset.prefix, source, embedder, chunker)
            .with_concurrency(config.embeddings.concurrency))
    }

    /// Number of embedding batches in flight while building
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.embed_concurrency = concurrency.max(1);
        self
    }

    /// Load the cached index if valid, otherwise build and persist a new one
    pub async fn prepare(&self) -> Result<VectorIndex> {
        self.ensure_cache_dir()?;

        match self.rebuild_reason() {
            Some(reason) => {
                tracing::info!("Rebuilding index: {}", reason);
                self.build_and_save().await
            }
            None => {
                tracing::info!("Using cached index at {}", self.index_path.display());
                match self.load_cached().await {
                    Ok(index) => Ok(index),
                    Err(e) => {
                        tracing::warn!("{}; falling back to a full rebuild", e);
                        self.build_and_save().await
                    }
                }
            }
        }
    }

    /// Whether the cached index must be rebuilt
    pub fn should_rebuild(&self) -> bool {
        self.rebuild_reason().is_some()
    }

    /// First reason the cached index is unusable, or `None` if it can be loaded
    pub fn rebuild_reason(&self) -> Option<RebuildReason> {
        if !self.index_path.exists() {
            return Some(RebuildReason::MissingIndex);
        }

        let Some(current) = self.current_fingerprint() else {
            return Some(RebuildReason::FingerprintUnavailable);
        };

        if !self.fingerprint_path.exists() {
            return Some(RebuildReason::MissingFingerprint);
        }

        match std::fs::read_to_string(&self.fingerprint_path) {
            Ok(raw) => {
                let stored = Fingerprint::from_stored(&raw);
                if stored != current {
                    Some(RebuildReason::FingerprintChanged {
                        stored: stored.to_string(),
                        current: current.to_string(),
                    })
                } else {
                    None
                }
            }
            Err(e) => Some(RebuildReason::FingerprintUnreadable(e.to_string())),
        }
    }

    /// Fingerprint of the dataset as it is now
    pub fn current_fingerprint(&self) -> Option<Fingerprint> {
        self.source.last_modified().map(Fingerprint::from_timestamp)
    }

    /// Ingest, chunk, embed, build, then persist index and fingerprint (in that order)
    pub async fn build_and_save(&self) -> Result<VectorIndex> {
        let started = Instant::now();
        self.ensure_cache_dir()?;

        // Capture the fingerprint before reading so a concurrent edit shows up as stale next time.
        let fingerprint = self.current_fingerprint();

        tracing::info!("Loading dataset from {}", self.source.describe());
        let source = Arc::clone(&self.source);
        let chunker = self.chunker.clone();
        let prefix = self.prefix.clone();
        let chunks = tokio::task::spawn_blocking(move || -> Result<Vec<Chunk>> {
            let records = source.records()?;
            let documents = to_documents(&records, &prefix);
            tracing::info!("Converted {} records to documents", documents.len());
            Ok(chunker.split(&documents))
        })
        .await
        .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

        tracing::info!(
            "Embedding {} chunks with {} ({})",
            chunks.len(),
            self.embedder.model(),
            self.embedder.name()
        );
        let embeddings = self.embed_all(&chunks).await?;

        let index = VectorIndex::build(
            self.embedder.model(),
            self.embedder.dimensions(),
            chunks,
            embeddings,
        )?;

        let index_path = self.index_path.clone();
        let index = tokio::task::spawn_blocking(move || -> Result<VectorIndex> {
            index.save(&index_path)?;
            Ok(index)
        })
        .await
        .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

        match &fingerprint {
            Some(fp) => write_atomic(&self.fingerprint_path, fp.as_str().as_bytes())?,
            None => {
                if self.fingerprint_path.exists() {
                    std::fs::remove_file(&self.fingerprint_path)?;
                }
            }
        }

        tracing::info!(
            "Index built and cached: {} chunks in {:.1}s",
            index.len(),
            started.elapsed().as_secs_f32()
        );
        Ok(index)
    }

    /// Deserialize the persisted index and check it matches the current embedder
    pub async fn load_cached(&self) -> Result<VectorIndex> {
        self.ensure_cache_dir()?;

        let path = self.index_path.clone();
        let index = tokio::task::spawn_blocking(move || VectorIndex::load(&path))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

        if index.embedding_model() != self.embedder.model()
            || index.dimensions() != self.embedder.dimensions()
        {
            return Err(Error::index_load(format!(
                "index built with {} ({} dims), current embedder is {} ({} dims)",
                index.embedding_model(),
                index.dimensions(),
                self.embedder.model(),
                self.embedder.dimensions()
            )));
        }

        tracing::info!(
            "Loaded cached index: {} chunks, built {}",
            index.len(),
            index.built_at()
        );
        Ok(index)
    }

    /// Delete the cached artifact and fingerprint, forcing the next `prepare` to rebuild
    pub fn invalidate(&self) -> Result<()> {
        for path in [&self.fingerprint_path, &self.index_path] {
            if path.exists() {
                std::fs::remove_file(path)?;
            }
        }
        tracing::info!("Cleared index cache in {}", self.cache_dir.display());
        Ok(())
    }

    async fn embed_all(&self, chunks: &[Chunk]) -> Result<Vec<Vec<f32>>> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let total_batches = texts.len().div_ceil(EMBED_BATCH_SIZE);
        let embedder = &self.embedder;

        let batches: Vec<Vec<Vec<f32>>> = futures::stream::iter(texts.chunks(EMBED_BATCH_SIZE).enumerate())
            .map(|(i, batch)| async move {
                let embedded = embedder.embed_batch(batch).await?;
                if (i + 1) % 50 == 0 {
                    tracing::info!("Embedded batch {}/{}", i + 1, total_batches);
                }
                Ok::<_, Error>(embedded)
            })
            .buffered(self.embed_concurrency)
            .try_collect()
            .await?;

        Ok(batches.into_iter().flatten().collect())
    }

    fn ensure_cache_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.cache_dir)?;
        Ok(())
    }
}
