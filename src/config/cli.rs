use crate::core::Storage;
use crate::utils::error::{ForecastError, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        match tokio::fs::read(&full_path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ForecastError::DataNotFound {
                path: full_path.display().to_string(),
            }),
            Err(e) => Err(ForecastError::IoError(e)),
        }
    }

    fn describe(&self) -> String {
        format!("local:{}", self.base_path.display())
    }
}
