use std::{net::SocketAddr, path::PathBuf};

use anyhow::Result;
use blob_store::BlobStorageConfig;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

const LOCAL_ENV: &str = "local";
const ENV_PREFIX: &str = "GATEWAY_";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub env: String,
    pub listen_addr: String,
    pub blob_storage: BlobStorageConfig,
    pub upload: UploadConfig,
    pub telemetry: TelemetryConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            env: LOCAL_ENV.to_string(),
            listen_addr: "0.0.0.0:8080".to_string(),
            blob_storage: Default::default(),
            upload: Default::default(),
            telemetry: Default::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_path(path: &str) -> Result<ServerConfig> {
        let config_str = std::fs::read_to_string(path)?;
        Self::from_figment(Figment::from(Serialized::defaults(ServerConfig::default()))
            .merge(Yaml::string(&config_str)))
    }

    /// Defaults overridden by `GATEWAY_*` environment variables only.
    pub fn from_env() -> Result<ServerConfig> {
        Self::from_figment(Figment::from(Serialized::defaults(ServerConfig::default())))
    }

    fn from_figment(figment: Figment) -> Result<ServerConfig> {
        let config: ServerConfig = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.listen_addr.parse::<SocketAddr>().is_err() {
            return Err(anyhow::anyhow!(
                "invalid listen address: {}",
                self.listen_addr
            ));
        }
        if let Err(e) = self.blob_storage.path.parse::<Url>() {
            return Err(anyhow::anyhow!(
                "invalid blob storage path {}: {}",
                self.blob_storage.path,
                e
            ));
        }
        if self.upload.source_file.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("upload source file must be set"));
        }
        Ok(())
    }

    pub fn structured_logging(&self) -> bool {
        self.env != LOCAL_ENV
    }

    pub fn instance_id(&self) -> String {
        self.telemetry
            .instance_id
            .clone()
            .unwrap_or_else(|| format!("{}-{}", self.env, Uuid::new_v4()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Local file whose bytes are written on every upload.
    pub source_file: PathBuf,
    pub content_type: String,
    /// Report uploads as created even when the store write failed. The
    /// failure is still logged.
    pub mask_store_errors: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            source_file: PathBuf::from("csv/test-file.csv"),
            content_type: "text/plain".to_string(),
            mask_store_errors: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    // Export spans over OTLP.
    pub enable_tracing: bool,
    // OpenTelemetry collector grpc endpoint.
    // Defaults to OTEL_EXPORTER_OTLP_ENDPOINT or localhost:4317 if empty.
    pub endpoint: Option<String>,
    // Instance ID for this gateway instance.
    pub instance_id: Option<String>,
}
