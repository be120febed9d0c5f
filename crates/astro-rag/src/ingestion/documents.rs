//! Record to document conversion

use crate::types::{Document, Record};

/// Turn each record into a labelled `field: value` document
pub fn to_documents(records: &[Record], prefix: &str) -> Vec<Document> {
    records
        .iter()
        .map(|record| {
            let mut content = format!("{}:\n", prefix);
            for (field, value) in record.fields() {
                content.push_str(field);
                content.push_str(": ");
                content.push_str(value);
                content.push('\n');
            }
            Document {
                content,
                prefix: Some(prefix.to_string()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_layout() {
        let records = vec![
            Record::from_iter([("planet", "Mars"), ("moons", "2")]),
            Record::from_iter([("planet", "Venus"), ("moons", "0")]),
        ];

        let docs = to_documents(&records, "Synthetic Planet Data");

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].content, "Synthetic Planet Data:\nplanet: Mars\nmoons: 2\n");
        assert_eq!(docs[1].prefix.as_deref(), Some("Synthetic Planet Data"));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let record = Record::from_iter([("star", "Sirius")]);
        let docs = to_documents(&[record.clone(), record], "Stars");
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0], docs[1]);
    }
}
