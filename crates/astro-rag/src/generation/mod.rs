//! Answer generation: prompt templates and the grounded/fallback orchestrator

pub mod orchestrator;
pub mod prompt;

pub use orchestrator::{split_fragments, AnswerOrchestrator, AnswerSettings, Outcome, Stage};
pub use prompt::{PromptBuilder, INSUFFICIENT_CONTEXT};
