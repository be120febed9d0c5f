//! Query request types

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Body of `POST /generate` and `POST /api/answer`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The user's question
    #[serde(default)]
    pub text: String,
}

impl GenerateRequest {
    /// Create a request
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Trimmed query text, or `EmptyQuery` when nothing is left
    pub fn query(&self) -> Result<&str> {
        let query = self.text.trim();
        if query.is_empty() {
            Err(Error::EmptyQuery)
        } else {
            Ok(query)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_trimmed() {
        let request = GenerateRequest::new("  What is a pulsar?\n");
        assert_eq!(request.query().unwrap(), "What is a pulsar?");
    }

    #[test]
    fn test_blank_query_rejected() {
        assert!(matches!(GenerateRequest::new("").query(), Err(Error::EmptyQuery)));
        assert!(matches!(GenerateRequest::new(" \t\n").query(), Err(Error::EmptyQuery)));
    }

    #[test]
    fn test_missing_text_field_defaults_to_empty() {
        let request: GenerateRequest = serde_json::from_str("{}").unwrap();
        assert!(request.query().is_err());
    }
}
