//! Recursive character chunking with overlap
//!
//! Text is split on the coarsest separator present (paragraph, line, word),
//! the pieces are greedily merged back into windows of at most `chunk_size`
//! characters, and each new window starts with up to `chunk_overlap`
//! characters carried over from the previous one. Pieces that are still too
//! long are split again with the finer separators, down to single characters.

use std::collections::VecDeque;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::{Chunk, Document};

/// Separators from coarsest to finest; the empty separator is the hard cut.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Recursive text chunker with configurable size and overlap
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 || chunk_overlap >= chunk_size {
            return Err(Error::Config(format!(
                "Invalid chunking: overlap {} must be smaller than size {}",
                chunk_overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    /// Create from configuration
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Split every document into chunks, tagging each with its document position
    pub fn split(&self, documents: &[Document]) -> Vec<Chunk> {
        documents
            .iter()
            .enumerate()
            .flat_map(|(document_id, doc)| {
                self.split_text(&doc.content)
                    .into_iter()
                    .enumerate()
                    .map(move |(chunk_index, text)| Chunk::new(document_id, chunk_index, text))
            })
            .collect()
    }

    /// Split a single text into chunk strings
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &SEPARATORS)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let mut separator = separators.last().copied().unwrap_or("");
        let mut finer: &[&str] = &[];
        for (i, &candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = candidate;
                break;
            }
            if text.contains(candidate) {
                separator = candidate;
                finer = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut pending: Vec<&str> = Vec::new();

        for piece in split_keeping_separator(text, separator) {
            if char_len(piece) < self.chunk_size {
                pending.push(piece);
                continue;
            }

            if !pending.is_empty() {
                chunks.extend(self.merge(&pending));
                pending.clear();
            }

            if finer.is_empty() {
                chunks.push(piece.to_string());
            } else {
                chunks.extend(self.split_recursive(piece, finer));
            }
        }

        if !pending.is_empty() {
            chunks.extend(self.merge(&pending));
        }

        chunks
    }

    /// Greedily merge small pieces into windows, carrying an overlap tail forward
    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let mut windows = Vec::new();
        let mut current: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);

            if total + len > self.chunk_size {
                if total > self.chunk_size {
                    tracing::warn!(
                        "Created a chunk of {} chars, longer than the limit of {}",
                        total,
                        self.chunk_size
                    );
                }

                if !current.is_empty() {
                    if let Some(window) = join_window(&current) {
                        windows.push(window);
                    }

                    while total > self.chunk_overlap
                        || (total + len > self.chunk_size && total > 0)
                    {
                        match current.pop_front() {
                            Some((_, dropped)) => total -= dropped,
                            None => break,
                        }
                    }
                }
            }

            current.push_back((piece, len));
            total += len;
        }

        if let Some(window) = join_window(&current) {
            windows.push(window);
        }

        windows
    }
}

impl Default for RecursiveChunker {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
        }
    }
}

/// Split at every occurrence of `separator`, keeping it at the start of the following piece.
/// An empty separator splits into single characters.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0usize;
    for (idx, _) in text.match_indices(separator) {
        if idx > start {
            pieces.push(&text[start..idx]);
        }
        start = idx;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

fn join_window(parts: &VecDeque<(&str, usize)>) -> Option<String> {
    let joined: String = parts.iter().map(|(piece, _)| *piece).collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(count: usize) -> String {
        (0..count)
            .map(|i| format!("word{:04}", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_short_document_is_single_chunk() {
        let chunker = RecursiveChunker::default();
        let doc = Document::new("Synthetic Planet Data:\nplanet: Mars\nmoons: 2\n");

        let chunks = chunker.split(&[doc]);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Synthetic Planet Data:\nplanet: Mars\nmoons: 2");
        assert_eq!(chunks[0].document_id, 0);
        assert_eq!(chunks[0].chunk_index, 0);
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let chunker = RecursiveChunker::default();
        let first = "a".repeat(300);
        let second = "b".repeat(300);
        let text = format!("{}\n\n{}", first, second);

        let chunks = chunker.split_text(&text);

        assert_eq!(chunks, vec![first, second]);
    }

    #[test]
    fn test_hard_cut_with_overlap() {
        let chunker = RecursiveChunker::default();
        let text = "x".repeat(1200);

        let chunks = chunker.split_text(&text);

        let lens: Vec<usize> = chunks.iter().map(|c| c.chars().count()).collect();
        assert_eq!(lens, vec![500, 500, 300]);
    }

    #[test]
    fn test_chunks_are_bounded_overlapping_and_cover_text() {
        let chunker = RecursiveChunker::default();
        let text = words(400);

        let chunks = chunker.split_text(&text);
        assert!(chunks.len() > 1);

        let mut previous: Option<(usize, usize)> = None;
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 500);
            let from = previous.map_or(0, |(start, _)| start + 1);
            let start = from + text[from..].find(chunk.as_str()).expect("chunk is a substring");
            let end = start + chunk.len();

            match previous {
                None => assert_eq!(start, 0),
                Some((_, prev_end)) => {
                    assert!(start < prev_end, "consecutive chunks must overlap");
                    assert!(prev_end - start <= 50);
                }
            }
            previous = Some((start, end));
        }
        assert_eq!(previous.map(|(_, end)| end), Some(text.len()));
    }

    #[test]
    fn test_deterministic() {
        let chunker = RecursiveChunker::default();
        let docs = vec![Document::new(words(300)), Document::new(words(50))];

        let first = chunker.split(&docs);
        let second = chunker.split(&docs);

        assert_eq!(first, second);
        assert!(first.iter().any(|c| c.document_id == 1));
    }

    #[test]
    fn test_multibyte_text_is_counted_in_chars() {
        let chunker = RecursiveChunker::new(10, 2).unwrap();
        let text = "☉".repeat(25);

        let chunks = chunker.split_text(&text);

        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks[0].chars().count(), 10);
    }

    #[test]
    fn test_split_keeping_separator() {
        assert_eq!(
            split_keeping_separator("a\n\n\n\nb", "\n\n"),
            vec!["a", "\n\n", "\n\nb"]
        );
        assert_eq!(split_keeping_separator("ab", ""), vec!["a", "b"]);
    }

    #[test]
    fn test_rejects_overlap_not_smaller_than_size() {
        assert!(RecursiveChunker::new(50, 50).is_err());
        assert!(RecursiveChunker::new(0, 0).is_err());
    }
}
