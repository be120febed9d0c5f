//! Embedded chunk index and its on-disk cache lifecycle

mod cache;
mod store;

pub use cache::{Fingerprint, IndexCacheManager, RebuildReason};
pub use store::{IndexedChunk, SearchHit, VectorIndex};

use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};

/// Write `bytes` to `path` via a temp file in the same directory and a rename,
/// so readers never observe a half-written file.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
