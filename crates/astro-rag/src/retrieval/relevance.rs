//! Lexical relevance check between retrieved context and the question
//!
//! Cheap keyword overlap, used to skip the grounded attempt when retrieval
//! clearly missed. No stemming, no punctuation stripping.

use std::collections::HashSet;

/// Trimmed context shorter than this is never relevant
pub const MIN_CONTEXT_CHARS: usize = 50;

/// Overlap ratio must exceed this for the context to count as relevant
pub const RELEVANCE_THRESHOLD: f32 = 0.2;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "what", "how", "when", "where", "why",
];

/// Whether `context` shares enough vocabulary with `question` to attempt a grounded answer
pub fn is_relevant(context: &str, question: &str) -> bool {
    if context.trim().chars().count() < MIN_CONTEXT_CHARS {
        return false;
    }
    overlap_ratio(context, question) > RELEVANCE_THRESHOLD
}

/// Fraction of the question's distinct content words that also appear in the context
///
/// Returns 0.0 when the question has no content words.
pub fn overlap_ratio(context: &str, question: &str) -> f32 {
    let question_words = content_words(question);
    if question_words.is_empty() {
        return 0.0;
    }
    let context_words = content_words(context);
    let shared = question_words.intersection(&context_words).count();
    shared as f32 / question_words.len() as f32
}

fn content_words(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(str::to_lowercase)
        .filter(|word| !STOP_WORDS.contains(&word.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_context_is_relevant() {
        let context = "Mars has two moons Phobos and Deimos, both small and irregularly shaped.";
        assert!(is_relevant(context, "How many moons does Mars have?"));
    }

    #[test]
    fn test_shared_content_words_with_padded_context() {
        // question content words: {moons, does, mars, have}
        let context = "Mars has two moons Phobos and Deimos. Both were discovered in 1877.";
        assert!(overlap_ratio(context, "What moons does Mars have") >= 0.5);
        assert!(is_relevant(context, "What moons does Mars have"));
    }

    #[test]
    fn test_short_context_is_never_relevant() {
        assert!(!is_relevant("Mars has two moons Phobos and Deimos", "Mars moons"));
        assert!(!is_relevant("   ", "Mars"));
    }

    #[test]
    fn test_stop_word_only_question() {
        let context = "The Sun is a G-type main-sequence star at the centre of the Solar System.";
        assert_eq!(overlap_ratio(context, "what is the"), 0.0);
        assert!(!is_relevant(context, "what is the"));
    }

    #[test]
    fn test_ratio_counts_distinct_question_words() {
        let context = "jupiter is the largest planet in the solar system by mass and volume";
        // content words: {jupiter, largest, saturn, ring} -> 2 shared
        let ratio = overlap_ratio(context, "Jupiter largest Saturn ring jupiter");
        assert!((ratio - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_threshold_is_strict() {
        let context = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu nu";
        // 1 of 5 content words shared = 0.2, not above the threshold
        assert!(!is_relevant(context, "alpha one two three four"));
        assert!(is_relevant(context, "alpha beta two three four"));
    }

    #[test]
    fn test_punctuation_is_not_stripped() {
        let context = "Saturn has prominent rings made mostly of water ice particles and rock.";
        assert_eq!(overlap_ratio(context, "rings?"), 0.0);
    }
}
