use std::path::{Path, PathBuf};

use anyhow::Result;
use blob_store::BlobStorageConfig;
use tracing::subscriber;
use tracing_subscriber::{layer::SubscriberExt, Layer};

use crate::{
    config::{ServerConfig, UploadConfig},
    routes::RouteState,
    service::Service,
};

pub const SOURCE_CONTENT: &str = "id,name,amount\n1,furnarius,10\n2,rufus,20\n";

pub struct TestService {
    pub service: Service,
    pub source_path: PathBuf,
    // keeping a reference to the temp dir to ensure it is not deleted
    #[allow(dead_code)]
    temp_dir: tempfile::TempDir,
}

impl TestService {
    /// Service over a bucket in a scratch directory.
    pub async fn new() -> Result<Self> {
        Self::new_with(
            |temp_dir| format!("file://{}", temp_dir.join("bucket").to_str().unwrap()),
            false,
        )
    }

    /// Service over an in-memory bucket, which tracks content types and
    /// generations.
    pub async fn new_in_memory() -> Result<Self> {
        Self::new_with(|_| "memory:///".to_string(), false)
    }

    /// Service whose bucket lives below a regular file, so every write fails.
    pub async fn new_with_unwritable_store(mask_store_errors: bool) -> Result<Self> {
        Self::new_with(
            |temp_dir| {
                let blocker = temp_dir.join("blocker");
                std::fs::write(&blocker, b"not a directory").unwrap();
                format!("file://{}", blocker.join("bucket").to_str().unwrap())
            },
            mask_store_errors,
        )
    }

    fn new_with(
        blob_path: impl FnOnce(&Path) -> String,
        mask_store_errors: bool,
    ) -> Result<Self> {
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        let _ = subscriber::set_global_default(
            tracing_subscriber::registry()
                .with(tracing_subscriber::fmt::layer().with_filter(env_filter)),
        );

        let temp_dir = tempfile::tempdir()?;
        let source_path = temp_dir.path().join("csv").join("test-file.csv");
        std::fs::create_dir_all(source_path.parent().unwrap())?;
        std::fs::write(&source_path, SOURCE_CONTENT)?;

        let cfg = ServerConfig {
            blob_storage: BlobStorageConfig::new(&blob_path(temp_dir.path())),
            upload: UploadConfig {
                source_file: source_path.clone(),
                mask_store_errors,
                ..Default::default()
            },
            ..Default::default()
        };
        cfg.validate()?;
        let srv = Service::new(cfg)?;

        Ok(Self {
            service: srv,
            source_path,
            temp_dir,
        })
    }

    pub fn route_state(&self) -> RouteState {
        self.service.route_state()
    }

    pub fn write_source(&self, content: &str) -> Result<()> {
        std::fs::write(&self.source_path, content)?;
        Ok(())
    }
}
