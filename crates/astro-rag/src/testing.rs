//! In-process stand-ins for the external collaborators, shared by unit tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::hash_map::DefaultHasher;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use crate::config::RagConfig;
use crate::domain::DomainGate;
use crate::error::{Error, Result};
use crate::generation::{AnswerOrchestrator, AnswerSettings};
use crate::ingestion::RecordSource;
use crate::providers::{EmbeddingProvider, GenerationProvider};
use crate::retrieval::{RetrievedChunk, Retriever};
use crate::server::state::AppState;
use crate::types::Record;

/// Bag-of-words embedder: each token bumps one hashed bucket
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0; self.dimensions];
        for token in text.split_whitespace() {
            let mut hasher = DefaultHasher::new();
            token.to_lowercase().hash(&mut hasher);
            vector[(hasher.finish() % self.dimensions as u64) as usize] += 1.0;
        }
        if vector.iter().all(|x| *x == 0.0) {
            vector[0] = 1.0;
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model(&self) -> &str {
        "hash-bow"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "hash"
    }
}

/// Records held in memory with a settable modification time
pub struct MemoryRecordSource {
    records: Vec<Record>,
    modified: Mutex<Option<DateTime<Utc>>>,
    fail: bool,
}

impl MemoryRecordSource {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            modified: Mutex::new(Some(Utc::now())),
            fail: false,
        }
    }

    /// Source whose modification time cannot be determined
    pub fn without_timestamp(self) -> Self {
        *self.modified.lock() = None;
        self
    }

    /// Source that behaves like a missing dataset
    pub fn failing() -> Self {
        Self {
            records: Vec::new(),
            modified: Mutex::new(None),
            fail: true,
        }
    }

    /// Pretend the data was modified at `at`
    pub fn touch(&self, at: DateTime<Utc>) {
        *self.modified.lock() = Some(at);
    }
}

impl RecordSource for MemoryRecordSource {
    fn records(&self) -> Result<Vec<Record>> {
        if self.fail {
            return Err(Error::dataset("dataset missing"));
        }
        Ok(self.records.clone())
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        *self.modified.lock()
    }

    fn describe(&self) -> String {
        format!("{} in-memory records", self.records.len())
    }
}

/// Retriever returning fixed texts (or a fixed failure) for every query
pub struct StubRetriever {
    result: std::result::Result<Vec<String>, String>,
}

impl StubRetriever {
    pub fn with_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            result: Ok(texts.into_iter().map(Into::into).collect()),
        }
    }

    pub fn empty() -> Self {
        Self { result: Ok(Vec::new()) }
    }

    pub fn failing() -> Self {
        Self {
            result: Err("index offline".to_string()),
        }
    }
}

#[async_trait]
impl Retriever for StubRetriever {
    async fn top_k(&self, _query: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
        match &self.result {
            Ok(texts) => Ok(texts
                .iter()
                .take(k)
                .map(|text| RetrievedChunk {
                    text: text.clone(),
                    similarity: 1.0,
                })
                .collect()),
            Err(message) => Err(Error::Retrieval(message.clone())),
        }
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Generator replaying a script of replies and recording every prompt
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    repeat: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// Replies in order; `Err` entries become generation failures
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = std::result::Result<&'static str, &'static str>>,
    {
        Self {
            script: Mutex::new(
                script
                    .into_iter()
                    .map(|step| step.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            repeat: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Fails every call
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Same reply to every call
    pub fn repeating(reply: &str) -> Self {
        Self {
            repeat: Some(reply.to_string()),
            ..Self::empty()
        }
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl GenerationProvider for ScriptedGenerator {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        if let Some(reply) = &self.repeat {
            return Ok(reply.clone());
        }
        match self.script.lock().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(Error::generation(message)),
            None => Err(Error::generation("script exhausted")),
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}

/// Ready state over stub collaborators with default config and no fragment delay
pub fn app_state(retriever: StubRetriever, generator: Arc<ScriptedGenerator>) -> AppState {
    app_state_with_config(RagConfig::default(), retriever, generator)
}

/// Ready state over stub collaborators with the given config and no fragment delay
pub fn app_state_with_config(
    config: RagConfig,
    retriever: StubRetriever,
    generator: Arc<ScriptedGenerator>,
) -> AppState {
    let settings = AnswerSettings {
        fragment_delay: Duration::ZERO,
        ..AnswerSettings::from_config(&config.answer)
    };
    let orchestrator = AnswerOrchestrator::new(Arc::new(retriever), generator, settings);
    let gate = DomainGate::from_config(&config.domain);

    let state = AppState::from_parts(config, orchestrator, gate, None);
    state.set_ready(true);
    state
}
