use std::path::PathBuf;

use ::tracing::{error, info_span};
use anyhow::Context;
use clap::Parser;
use service::Service;

mod config;
mod http_objects;
mod middleware;
mod routes;
mod service;
mod source;
mod tracing;
use tracing::setup_tracing;

#[cfg(test)]
mod testing;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "config file", help = "Path to config file")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match cli.config {
        Some(path) => config::ServerConfig::from_path(&path.to_string_lossy())
            .with_context(|| format!("error loading config from {}", path.display()))?,
        None => config::ServerConfig::from_env()?,
    };

    let tracing_provider = setup_tracing(&config)?;

    let root_span = info_span!(
        "bucket-gateway",
        env = config.env,
        "gateway-instance" = config.instance_id()
    );
    let _guard = root_span.enter();

    match Service::new(config) {
        Ok(service) => {
            if let Err(err) = service.start().await {
                error!("Error starting service: {:?}", err);
            }
        }
        Err(err) => error!("Error creating service: {:?}", err),
    }

    // export traces before shutdown
    if let Some(tracer_provider) = tracing_provider {
        if let Err(err) = tracer_provider.force_flush() {
            error!("Error flushing traces: {:?}", err);
        }
        if let Err(err) = tracer_provider.shutdown() {
            error!("Error shutting down tracer provider: {:?}", err);
        }
    }
    Ok(())
}
