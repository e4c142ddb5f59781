//! Scoped write channel to the object store.

use object_store::{path::Path, MultipartUpload, WriteMultipart};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::{BlobError, BlobResult, Generation, PutResult};

// Parts buffered in flight before `write` waits on the store.
const MAX_IN_FLIGHT_PARTS: usize = 4;

/// Sequential byte sink for one object.
///
/// Bytes become visible in the store only after [`WriteChannel::close`]. A
/// channel dropped before it is closed aborts its upload.
pub struct WriteChannel {
    key: String,
    path: Path,
    upload: Option<WriteMultipart>,
    hasher: Sha256,
    size_bytes: u64,
}

impl WriteChannel {
    pub(crate) fn new(key: String, path: Path, upload: Box<dyn MultipartUpload>) -> Self {
        Self {
            key,
            path,
            upload: Some(WriteMultipart::new(upload)),
            hasher: Sha256::new(),
            size_bytes: 0,
        }
    }

    pub async fn write(&mut self, buf: &[u8]) -> BlobResult<()> {
        let Some(upload) = self.upload.as_mut() else {
            return Err(closed_channel_error(&self.key));
        };
        upload.wait_for_capacity(MAX_IN_FLIGHT_PARTS).await?;
        upload.write(buf);
        self.hasher.update(buf);
        self.size_bytes += buf.len() as u64;
        Ok(())
    }

    /// Finalizes the object and returns what was written.
    pub async fn close(mut self) -> BlobResult<PutResult> {
        let Some(upload) = self.upload.take() else {
            return Err(closed_channel_error(&self.key));
        };
        let result = upload.finish().await?;
        let hash = format!("{:x}", std::mem::take(&mut self.hasher).finalize());
        debug!(key = %self.key, size_bytes = self.size_bytes, "closed write channel");
        Ok(PutResult {
            url: self.path.to_string(),
            size_bytes: self.size_bytes,
            sha256_hash: hash,
            generation: Generation {
                e_tag: result.e_tag,
                version: result.version,
            },
        })
    }
}

impl Drop for WriteChannel {
    fn drop(&mut self) {
        let Some(upload) = self.upload.take() else {
            return;
        };
        let key = std::mem::take(&mut self.key);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    match upload.abort().await {
                        Ok(()) => debug!(key = %key, "aborted unfinished upload"),
                        Err(e) => warn!(key = %key, "failed to abort unfinished upload: {}", e),
                    }
                });
            }
            Err(_) => warn!(key = %key, "no runtime to abort unfinished upload"),
        }
    }
}

fn closed_channel_error(key: &str) -> BlobError {
    BlobError::Store {
        source: object_store::Error::Generic {
            store: "WriteChannel",
            source: format!("write channel for {} is closed", key).into(),
        },
    }
}
