pub mod cli;
pub mod object_store;
pub mod toml_config;

use crate::core::Storage;
use crate::utils::error::{ForecastError, Result};
use std::sync::Arc;
use toml_config::{StorageKind, TomlConfig};

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "urban-forecast")]
#[command(about = "Serves dashboard analytics and trend forecasts from CSV datasets")]
pub struct CliConfig {
    /// Address to bind
    #[arg(long, env = "BIND_ADDR")]
    pub bind: Option<String>,

    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Directory holding the dataset CSV files (local storage only)
    #[arg(long, env = "DATA_DIR")]
    pub data_dir: Option<String>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the TOML file when given and applies command-line overrides on top.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(data_dir) = &self.data_dir {
            config.storage.data_dir = data_dir.clone();
        }

        Ok(config)
    }
}

/// Builds the storage backend selected by `[storage] kind`.
pub async fn build_storage(config: &TomlConfig) -> Result<Arc<dyn Storage>> {
    let storage = &config.storage;
    match storage.kind {
        StorageKind::Local => Ok(Arc::new(cli::LocalStorage::new(storage.data_dir.clone()))),
        StorageKind::Http => {
            let base_url = storage.base_url.clone().ok_or_else(|| ForecastError::MissingConfigError {
                field: "storage.base_url".to_string(),
            })?;
            Ok(Arc::new(object_store::HttpStorage::new(base_url)))
        }
        #[cfg(feature = "s3")]
        StorageKind::S3 => {
            let bucket = storage.bucket.clone().ok_or_else(|| ForecastError::MissingConfigError {
                field: "storage.bucket".to_string(),
            })?;
            let region = storage
                .region
                .clone()
                .unwrap_or_else(|| "ap-south-1".to_string());
            let prefix = storage.prefix.clone().unwrap_or_default();
            Ok(Arc::new(
                object_store::S3Storage::from_env(bucket, prefix, region).await,
            ))
        }
        #[cfg(not(feature = "s3"))]
        StorageKind::S3 => Err(ForecastError::ConfigError {
            message: "S3 storage requires building with the `s3` feature".to_string(),
        }),
    }
}
