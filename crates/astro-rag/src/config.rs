//! Configuration for the AstroAI RAG service
//!
//! Values come from three layers, later ones winning: built-in defaults, an
//! optional TOML file, and a handful of environment variables.

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Upper bound on provider retries; backoff doubles per attempt
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Source dataset
    pub dataset: DatasetConfig,
    /// On-disk index cache
    pub cache: CacheConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Generation (LLM) configuration
    pub llm: LlmConfig,
    /// Answer pipeline tunables
    pub answer: AnswerConfig,
    /// Domain gate configuration
    pub domain: DomainConfig,
}

impl RagConfig {
    /// Load configuration from an optional TOML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
                })?;
                Self::from_toml(&raw)?
            }
            None => Self::default(),
        };

        config.apply_env();
        Ok(config)
    }

    /// Parse configuration from TOML text (missing sections fall back to defaults)
    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.trim().is_empty() {
                self.llm.api_key = Some(key);
            }
        }
        if let Ok(host) = std::env::var("ASTRO_RAG_HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("ASTRO_RAG_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
        {
            self.server.port = port;
        }
        if let Ok(dataset) = std::env::var("ASTRO_RAG_DATASET") {
            self.dataset.path = PathBuf::from(dataset);
        }
    }

    /// Check invariants that would otherwise surface as confusing runtime failures
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunking.chunk_size must be positive".to_string()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.answer.top_k == 0 {
            return Err(Error::Config("answer.top_k must be positive".to_string()));
        }
        if self.embeddings.concurrency == 0 {
            return Err(Error::Config("embeddings.concurrency must be positive".to_string()));
        }
        if let Some(origin) = self
            .server
            .allowed_origins
            .iter()
            .find(|origin| origin.parse::<HeaderValue>().is_err())
        {
            return Err(Error::Config(format!(
                "server.allowed_origins contains an invalid origin: {:?}",
                origin
            )));
        }
        for (key, retries) in [
            ("embeddings.max_retries", self.embeddings.max_retries),
            ("llm.max_retries", self.llm.max_retries),
        ] {
            if retries > MAX_RETRIES_LIMIT {
                return Err(Error::Config(format!(
                    "{} ({}) must not exceed {}",
                    key, retries, MAX_RETRIES_LIMIT
                )));
            }
        }
        if self.llm.backend == GenerationBackend::Gemini
            && self.llm.api_key.as_deref().map_or(true, |k| k.trim().is_empty())
        {
            return Err(Error::Config(
                "Gemini backend selected but no API key is set (GEMINI_API_KEY)".to_string(),
            ));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Origins allowed by CORS (empty = allow any)
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            allowed_origins: vec!["http://localhost:8080".to_string()],
        }
    }
}

/// Source dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// CSV file with one record per row
    pub path: PathBuf,
    /// Label written as the first line of every document
    pub prefix: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/synthetic_space_data_30k.csv"),
            prefix: "Synthetic Planet Data".to_string(),
        }
    }
}

/// Index cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding the index artifact and its fingerprint
    pub dir: PathBuf,
    /// Index artifact file name
    pub index_file: String,
    /// Fingerprint file name
    pub fingerprint_file: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("cache"),
            index_file: "vectorstore.bin".to_string(),
            fingerprint_file: "data_hash.txt".to_string(),
        }
    }
}

impl CacheConfig {
    /// Full path of the index artifact
    pub fn index_path(&self) -> PathBuf {
        self.dir.join(&self.index_file)
    }

    /// Full path of the fingerprint file
    pub fn fingerprint_path(&self) -> PathBuf {
        self.dir.join(&self.fingerprint_file)
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
        }
    }
}

/// Embedding (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub model: String,
    /// Embedding dimensions (384 for all-MiniLM-L6-v2)
    pub dimensions: usize,
    /// Parallel embedding requests while building the index
    pub concurrency: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "all-minilm".to_string(),
            dimensions: 384,
            concurrency: 8,
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

/// Generation backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenerationBackend {
    /// Google Gemini via the Generative Language API
    #[default]
    Gemini,
    /// Local Ollama server
    Ollama,
}

/// Generation (LLM) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Which backend answers prompts
    pub backend: GenerationBackend,
    /// Model name
    pub model: String,
    /// API key (Gemini only; usually supplied via GEMINI_API_KEY)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Base URL of the generation API
    pub base_url: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Maximum tokens in a generated answer
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: GenerationBackend::Gemini,
            model: "gemini-2.0-flash".to_string(),
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            temperature: 0.3,
            max_output_tokens: 2048,
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

/// Answer pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerConfig {
    /// Chunks retrieved per query
    pub top_k: usize,
    /// Context must be longer than this (trimmed, in characters) for a grounded attempt
    pub min_context_chars: usize,
    /// Pause between streamed fragments in milliseconds
    pub fragment_delay_ms: u64,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            min_context_chars: 100,
            fragment_delay_ms: 100,
        }
    }
}

impl AnswerConfig {
    /// Pause between streamed fragments
    pub fn fragment_delay(&self) -> Duration {
        Duration::from_millis(self.fragment_delay_ms)
    }
}

/// Domain gate configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
    /// Additional vocabulary terms on top of the built-in list
    pub extra_terms: Vec<String>,
}
