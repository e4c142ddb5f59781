use std::path::PathBuf;

use anyhow::{Context, Result};
use bytes::Bytes;
use tracing::debug;

/// The local file every upload writes to the bucket.
///
/// Read from disk on each call so edits to the file show up in the next
/// upload.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn read(&self) -> Result<Bytes> {
        let content = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("failed to read source file {}", self.path.display()))?;
        debug!(path = %self.path.display(), size_bytes = content.len(), "read source file");
        Ok(Bytes::from(content))
    }
}
