//! Bucket access for the gateway.
//!
//! [`BlobStorage`] wraps an [`object_store::ObjectStore`] selected from a URL
//! (`gs://bucket/prefix`, `file:///path`, `memory:///`) and addresses objects
//! by [`ObjectKey`]. Writes go through a [`WriteChannel`]; reads are pinned to
//! the object [`Generation`] observed when its handle was fetched.

mod config;
mod error;
mod key;
mod storage;
mod writer;

pub use config::{default_blob_store_path, BlobStorageConfig};
pub use error::{BlobError, BlobResult};
pub use key::ObjectKey;
pub use storage::{BlobHandle, BlobStorage, Generation, PutResult, StoredObject};
pub use writer::WriteChannel;
