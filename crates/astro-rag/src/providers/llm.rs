//! Generation provider trait: prompt in, text out

use async_trait::async_trait;
use crate::error::Result;

/// Trait for black-box text completion
///
/// Implementations:
/// - `GeminiClient`: Google Generative Language API (gemini-2.0-flash)
/// - `OllamaLlm`: Local Ollama server
///
/// Failures of any kind (transport, quota, model) surface as `Error::Generation`.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Complete a fully rendered prompt
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
