//! Blob storage configuration.

use std::env;

use serde::{Deserialize, Serialize};

/// Configuration for blob storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobStorageConfig {
    /// Bucket URL (e.g., `gs://bucket/prefix`, `file:///path`, `memory:///`).
    #[serde(default = "default_blob_store_path")]
    pub path: String,
}

impl BlobStorageConfig {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }
}

impl Default for BlobStorageConfig {
    fn default() -> Self {
        Self {
            path: default_blob_store_path(),
        }
    }
}

/// Default blob store path (local filesystem).
pub fn default_blob_store_path() -> String {
    format!(
        "file://{}",
        env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join("gateway_storage/blobs")
            .to_str()
            .unwrap_or("./gateway_storage/blobs")
    )
}
