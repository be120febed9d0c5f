//! Application state for the AstroAI server

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::domain::DomainGate;
use crate::error::Result;
use crate::generation::{AnswerOrchestrator, AnswerSettings};
use crate::index::{IndexCacheManager, VectorIndex};
use crate::ingestion::CsvRecordSource;
use crate::providers::{embedding_from_config, generation_from_config};
use crate::retrieval::VectorRetriever;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Answer pipeline
    orchestrator: AnswerOrchestrator,
    /// Out-of-domain filter applied before the pipeline
    gate: DomainGate,
    /// Summary of the loaded index
    index: Option<IndexStats>,
    /// Ready state
    ready: RwLock<bool>,
}

/// Summary of the loaded index, reported by `/api/info`
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub chunks: usize,
    pub embedding_model: String,
    pub dimensions: usize,
    pub built_at: DateTime<Utc>,
}

impl IndexStats {
    pub fn of(index: &VectorIndex) -> Self {
        Self {
            chunks: index.len(),
            embedding_model: index.embedding_model().to_string(),
            dimensions: index.dimensions(),
            built_at: index.built_at(),
        }
    }
}

impl AppState {
    /// Create application state, loading or building the index first
    ///
    /// With `force_rebuild` the cached index is discarded before preparing.
    pub async fn new(config: RagConfig, force_rebuild: bool) -> Result<Self> {
        tracing::info!("Initializing AstroAI application state...");

        let embedder = embedding_from_config(&config)?;
        let generator = generation_from_config(&config)?;
        tracing::info!(
            "Providers ready (embeddings: {} via {}, generation: {} via {})",
            embedder.model(),
            embedder.name(),
            generator.model(),
            generator.name()
        );

        let source = Arc::new(CsvRecordSource::new(config.dataset.path.clone()));
        let manager = IndexCacheManager::from_config(&config, source, Arc::clone(&embedder))?;
        if force_rebuild {
            manager.invalidate()?;
        }
        let index = Arc::new(manager.prepare().await?);
        let stats = IndexStats::of(&index);
        tracing::info!("Index ready with {} chunks", stats.chunks);

        let retriever = Arc::new(VectorRetriever::new(index, embedder));
        let orchestrator = AnswerOrchestrator::new(
            retriever,
            generator,
            AnswerSettings::from_config(&config.answer),
        );
        let gate = DomainGate::from_config(&config.domain);

        let state = Self::from_parts(config, orchestrator, gate, Some(stats));
        state.set_ready(true);
        Ok(state)
    }

    /// Assemble state from already-built parts (not ready until `set_ready`)
    pub fn from_parts(
        config: RagConfig,
        orchestrator: AnswerOrchestrator,
        gate: DomainGate,
        index: Option<IndexStats>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                orchestrator,
                gate,
                index,
                ready: RwLock::new(false),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the answer pipeline
    pub fn orchestrator(&self) -> &AnswerOrchestrator {
        &self.inner.orchestrator
    }

    /// Get the domain gate
    pub fn gate(&self) -> &DomainGate {
        &self.inner.gate
    }

    /// Summary of the loaded index
    pub fn index_stats(&self) -> Option<&IndexStats> {
        self.inner.index.as_ref()
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
