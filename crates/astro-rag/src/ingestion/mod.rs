//! Dataset ingestion: records, documents and chunks

mod chunker;
mod documents;
pub mod records;

pub use chunker::RecursiveChunker;
pub use documents::to_documents;
pub use records::{CsvRecordSource, RecordSource};
