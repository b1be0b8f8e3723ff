pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "s3")]
pub use config::object_store::S3Storage;

pub use config::cli::LocalStorage;
pub use config::object_store::HttpStorage;
pub use config::toml_config::TomlConfig;
pub use core::engine::ReportEngine;
pub use utils::error::{ForecastError, Result};
