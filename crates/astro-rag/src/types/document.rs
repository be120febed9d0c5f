//! Record, document and chunk types

use serde::{Deserialize, Serialize};

/// One source row: ordered column name / value pairs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Create a record from ordered fields
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Fields in their native column order
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Look up a value by column name
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no columns
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Flat text document derived from a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Full text content
    pub content: String,
    /// Label the content was introduced with
    pub prefix: Option<String>,
}

impl Document {
    /// Create a document without a prefix label
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            prefix: None,
        }
    }
}

/// A bounded text window of a document, the unit of retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of the source document in ingestion order
    pub document_id: usize,
    /// Position of this chunk within its document
    pub chunk_index: usize,
    /// Chunk text
    pub text: String,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(document_id: usize, chunk_index: usize, text: impl Into<String>) -> Self {
        Self {
            document_id,
            chunk_index,
            text: text.into(),
        }
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
