//! Answer types returned by the orchestrator and the HTTP layer

use serde::{Deserialize, Serialize};

/// Source label for answers grounded in retrieved context
pub const SOURCE_DOCUMENTS: &str = "Scientific Documents";
/// Source label for general-knowledge answers
pub const SOURCE_GENERAL: &str = "General Space Science Knowledge";
/// Source label for failed requests
pub const SOURCE_ERROR: &str = "error";
/// Source label for out-of-domain rejections
pub const SOURCE_DOMAIN_GATE: &str = "Domain Gate";

/// Message returned in batch mode when every generation attempt failed
pub const APOLOGY_MESSAGE: &str = "I apologize, but I'm unable to provide an answer at the moment. Please try asking about a specific space science topic.";

/// How an answer was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Grounded in retrieved documents
    RagContext,
    /// General knowledge, no retrieved context
    GeminiFallback,
    /// Query outside the service's domain
    Rejection,
    /// Generation failed
    Error,
}

impl ResponseType {
    /// Source label that accompanies this response type
    pub fn source(&self) -> &'static str {
        match self {
            Self::RagContext => SOURCE_DOCUMENTS,
            Self::GeminiFallback => SOURCE_GENERAL,
            Self::Rejection => SOURCE_DOMAIN_GATE,
            Self::Error => SOURCE_ERROR,
        }
    }
}

/// Final answer of a non-streaming request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResult {
    /// Answer text
    pub message: String,
    /// How the answer was produced
    pub response_type: ResponseType,
    /// Human-readable provenance label
    pub source: String,
}

impl AnswerResult {
    /// Answer grounded in retrieved documents
    pub fn grounded(message: impl Into<String>) -> Self {
        Self::of(ResponseType::RagContext, message)
    }

    /// Answer from general knowledge
    pub fn fallback(message: impl Into<String>) -> Self {
        Self::of(ResponseType::GeminiFallback, message)
    }

    /// Fixed apology after generation failed
    pub fn apology() -> Self {
        Self::of(ResponseType::Error, APOLOGY_MESSAGE)
    }

    fn of(response_type: ResponseType, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            response_type,
            source: response_type.source().to_string(),
        }
    }
}

/// Body returned with a 404 for out-of-domain queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionBody {
    /// Always `rejection`
    pub response_type: ResponseType,
    /// One of the fixed rejection messages
    pub message: String,
}

impl RejectionBody {
    /// Create a rejection body
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Rejection,
            message: message.into(),
        }
    }
}
