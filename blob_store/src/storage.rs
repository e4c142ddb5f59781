use std::sync::Arc;

use bytes::Bytes;
use object_store::{
    gcp::GoogleCloudStorageBuilder,
    parse_url,
    path::Path,
    Attribute,
    Attributes,
    GetOptions,
    ObjectStore,
    ObjectStoreScheme,
    PutMultipartOpts,
};
use tracing::{debug, info};
use url::Url;

use crate::{BlobError, BlobResult, BlobStorageConfig, ObjectKey, WriteChannel};

/// Version marker the store assigns to each write of a key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    pub e_tag: Option<String>,
    /// Backend object version (the generation number on GCS).
    pub version: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PutResult {
    pub url: String,
    pub size_bytes: u64,
    pub sha256_hash: String,
    pub generation: Generation,
}

/// Metadata of an object, pinned to the generation seen when it was fetched.
#[derive(Debug, Clone)]
pub struct BlobHandle {
    pub key: ObjectKey,
    pub path: Path,
    pub generation: Generation,
    pub size_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: Option<String>,
    pub generation: Generation,
}

/// Bucket-scoped access to the backing object store.
#[derive(Clone)]
pub struct BlobStorage {
    object_store: Arc<dyn ObjectStore>,
    path: Path,
    attributes_supported: bool,
}

impl BlobStorage {
    pub fn new(config: BlobStorageConfig) -> BlobResult<Self> {
        let (object_store, path, scheme) = Self::build_object_store(&config.path)?;
        info!(url = %config.path, "using blob store");
        Ok(Self {
            object_store: Arc::from(object_store),
            path,
            // The local filesystem backend rejects object attributes.
            attributes_supported: !matches!(scheme, ObjectStoreScheme::Local),
        })
    }

    pub fn build_object_store(
        url_str: &str,
    ) -> BlobResult<(Box<dyn ObjectStore>, Path, ObjectStoreScheme)> {
        let url = url_str.parse::<Url>().map_err(|e| BlobError::InvalidUri {
            uri: url_str.to_string(),
            reason: e.to_string(),
        })?;
        let (scheme, path) = ObjectStoreScheme::parse(&url).map_err(|e| BlobError::InvalidUri {
            uri: url_str.to_string(),
            reason: e.to_string(),
        })?;
        match scheme {
            ObjectStoreScheme::GoogleCloudStorage => {
                // GOOGLE_* variables carry the service account and bucket options.
                let gcs = GoogleCloudStorageBuilder::from_env()
                    .with_url(url_str)
                    .build()?;
                Ok((Box::new(gcs), path, scheme))
            }
            _ => {
                let (object_store, path) = parse_url(&url)?;
                Ok((object_store, path, scheme))
            }
        }
    }

    pub fn object_path(&self, key: &ObjectKey) -> Path {
        self.path
            .child(key.partner_hash())
            .child(key.file_name())
    }

    /// Opens a write channel for `key`; the object appears once the channel is
    /// closed.
    pub async fn writer(&self, key: &ObjectKey, content_type: &str) -> BlobResult<WriteChannel> {
        let path = self.object_path(key);
        let mut opts = PutMultipartOpts::default();
        if self.attributes_supported {
            let mut attributes = Attributes::new();
            attributes.insert(Attribute::ContentType, content_type.to_string().into());
            opts.attributes = attributes;
        }
        let upload = self.object_store.put_multipart_opts(&path, opts).await?;
        debug!(key = %key, path = %path, "opened write channel");
        Ok(WriteChannel::new(key.to_string(), path, upload))
    }

    pub async fn put(
        &self,
        key: &ObjectKey,
        data: &[u8],
        content_type: &str,
    ) -> BlobResult<PutResult> {
        let mut writer = self.writer(key, content_type).await?;
        writer.write(data).await?;
        writer.close().await
    }

    pub async fn head(&self, key: &ObjectKey) -> BlobResult<BlobHandle> {
        let path = self.object_path(key);
        let meta = self.object_store.head(&path).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => BlobError::NotFound {
                key: key.to_string(),
            },
            e => e.into(),
        })?;
        Ok(BlobHandle {
            key: key.clone(),
            path,
            generation: Generation {
                e_tag: meta.e_tag,
                version: meta.version,
            },
            size_bytes: meta.size,
        })
    }

    /// Reads the content of the generation pinned by `handle`.
    ///
    /// Fails with [`BlobError::GenerationMismatch`] if the object was rewritten
    /// after the handle was fetched.
    pub async fn read(&self, handle: &BlobHandle) -> BlobResult<StoredObject> {
        let options = GetOptions {
            if_match: handle.generation.e_tag.clone(),
            version: handle.generation.version.clone(),
            ..Default::default()
        };
        let mismatch = || BlobError::GenerationMismatch {
            key: handle.key.to_string(),
        };
        let result = match self.object_store.get_opts(&handle.path, options).await {
            Ok(result) => result,
            // The pinned generation no longer exists.
            Err(object_store::Error::NotFound { .. }) => return Err(mismatch()),
            Err(e) => return Err(e.into()),
        };
        let generation = Generation {
            e_tag: result.meta.e_tag.clone(),
            version: result.meta.version.clone(),
        };
        if handle.generation.e_tag.is_some() && generation.e_tag != handle.generation.e_tag {
            return Err(mismatch());
        }
        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|value| value.to_string());
        let data = result.bytes().await?;
        Ok(StoredObject {
            data,
            content_type,
            generation,
        })
    }

    pub async fn get(&self, key: &ObjectKey) -> BlobResult<StoredObject> {
        let handle = self.head(key).await?;
        self.read(&handle).await
    }
}
