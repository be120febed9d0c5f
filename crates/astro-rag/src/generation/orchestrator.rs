//! Answer orchestration: retrieve, gate, grounded attempt, general-knowledge fallback
//!
//! The decision logic is an explicit [`Stage`] machine advanced by
//! [`AnswerOrchestrator::step`]. Batch and streaming entry points drive the
//! same machine and only differ in how the final [`Outcome`] is rendered.

use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use std::time::Duration;

use crate::config::AnswerConfig;
use crate::providers::GenerationProvider;
use crate::retrieval::{is_relevant, Retriever};
use crate::types::AnswerResult;

use super::prompt::{PromptBuilder, INSUFFICIENT_CONTEXT};

/// Separator the final answer is split on for streaming
const FRAGMENT_SEPARATOR: &str = ". ";

/// Tunables of the answer pipeline
#[derive(Debug, Clone)]
pub struct AnswerSettings {
    /// Chunks retrieved per query
    pub top_k: usize,
    /// Trimmed context must be longer than this for a grounded attempt
    pub min_context_chars: usize,
    /// Pause between streamed fragments
    pub fragment_delay: Duration,
}

impl Default for AnswerSettings {
    fn default() -> Self {
        Self::from_config(&AnswerConfig::default())
    }
}

impl AnswerSettings {
    pub fn from_config(config: &AnswerConfig) -> Self {
        Self {
            top_k: config.top_k,
            min_context_chars: config.min_context_chars,
            fragment_delay: config.fragment_delay(),
        }
    }
}

/// Position in the per-request state machine
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Look up the top-k chunks for the query
    Retrieve,
    /// Decide whether the retrieved context is worth a grounded attempt
    Gate { context: String },
    /// Answer from the context, unless the model reports it insufficient
    Grounded { context: String },
    /// Answer from general knowledge
    Fallback,
    /// Terminal
    Done(Outcome),
}

/// Final result of the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// An answer was produced
    Answered(AnswerResult),
    /// Every generation attempt failed
    Failed(String),
}

/// Runs the answer pipeline against a retriever and a generation provider
#[derive(Clone)]
pub struct AnswerOrchestrator {
    retriever: Arc<dyn Retriever>,
    generator: Arc<dyn GenerationProvider>,
    settings: AnswerSettings,
}

impl AnswerOrchestrator {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        generator: Arc<dyn GenerationProvider>,
        settings: AnswerSettings,
    ) -> Self {
        Self {
            retriever,
            generator,
            settings,
        }
    }

    /// Pipeline settings
    pub fn settings(&self) -> &AnswerSettings {
        &self.settings
    }

    /// Generation provider in use
    pub fn generator(&self) -> &dyn GenerationProvider {
        self.generator.as_ref()
    }

    /// Advance the state machine by one transition
    pub async fn step(&self, query: &str, stage: Stage) -> Stage {
        match stage {
            Stage::Retrieve => {
                let context = match self.retriever.top_k(query, self.settings.top_k).await {
                    Ok(chunks) => chunks
                        .into_iter()
                        .map(|c| c.text)
                        .collect::<Vec<_>>()
                        .join("\n\n"),
                    Err(e) => {
                        tracing::warn!("Retrieval via {} failed: {}", self.retriever.name(), e);
                        String::new()
                    }
                };
                Stage::Gate { context }
            }

            Stage::Gate { context } => {
                let long_enough = context.trim().chars().count() > self.settings.min_context_chars;
                if long_enough && is_relevant(&context, query) {
                    Stage::Grounded { context }
                } else {
                    tracing::debug!("Retrieved context not usable, skipping grounded attempt");
                    Stage::Fallback
                }
            }

            Stage::Grounded { context } => {
                let prompt = PromptBuilder::rag_prompt(&context, query);
                match self.generator.complete(&prompt).await {
                    Ok(text) if !text.contains(INSUFFICIENT_CONTEXT) => {
                        Stage::Done(Outcome::Answered(AnswerResult::grounded(text)))
                    }
                    Ok(_) => {
                        tracing::info!("Context reported insufficient, using general knowledge");
                        Stage::Fallback
                    }
                    Err(e) => {
                        tracing::warn!("Grounded generation failed: {}", e);
                        Stage::Fallback
                    }
                }
            }

            Stage::Fallback => {
                let prompt = PromptBuilder::fallback_prompt(query);
                match self.generator.complete(&prompt).await {
                    Ok(text) => Stage::Done(Outcome::Answered(AnswerResult::fallback(text))),
                    Err(e) => Stage::Done(Outcome::Failed(e.to_string())),
                }
            }

            done @ Stage::Done(_) => done,
        }
    }

    /// Drive the state machine from `Retrieve` to `Done`
    pub async fn run(&self, query: &str) -> Outcome {
        let mut stage = Stage::Retrieve;
        loop {
            stage = match self.step(query, stage).await {
                Stage::Done(outcome) => return outcome,
                next => next,
            };
        }
    }

    /// Answer in one piece; generation failure becomes the fixed apology
    pub async fn answer(&self, query: &str) -> AnswerResult {
        match self.run(query).await {
            Outcome::Answered(result) => result,
            Outcome::Failed(message) => {
                tracing::error!("All generation attempts failed: {}", message);
                AnswerResult::apology()
            }
        }
    }

    /// Answer as a lazy stream of sentence fragments
    ///
    /// Nothing runs until the stream is polled. Generation failure yields a
    /// single `"Error: <message>"` fragment and ends the stream.
    pub fn answer_stream(&self, query: impl Into<String>) -> BoxStream<'static, String> {
        let this = self.clone();
        let query = query.into();
        let delay = self.settings.fragment_delay;

        stream::once(async move { this.run(&query).await })
            .flat_map(move |outcome| match outcome {
                Outcome::Answered(result) => {
                    tracing::debug!("Streaming {:?} answer", result.response_type);
                    paced(split_fragments(&result.message), delay)
                }
                Outcome::Failed(message) => {
                    tracing::error!("All generation attempts failed: {}", message);
                    stream::iter([format!("Error: {}", message)]).boxed()
                }
            })
            .boxed()
    }
}

/// Split answer text on `". "`, trimming each piece and re-suffixing it with `". "`
pub fn split_fragments(text: &str) -> Vec<String> {
    text.split(FRAGMENT_SEPARATOR)
        .map(|piece| format!("{}{}", piece.trim(), FRAGMENT_SEPARATOR))
        .collect()
}

/// Emit fragments with `delay` between them (none before the first)
fn paced(fragments: Vec<String>, delay: Duration) -> BoxStream<'static, String> {
    stream::iter(fragments.into_iter().enumerate())
        .then(move |(i, fragment)| async move {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            fragment
        })
        .boxed()
}
