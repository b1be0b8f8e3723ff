use crate::domain::model::{CachePolicy, DataRow};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Read-only access to dataset files, local or remote.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>>;

    /// Human-readable location used in logs.
    fn describe(&self) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn target_year(&self) -> i32;
    fn milestone_year(&self) -> i32;
    fn cache_policy(&self, endpoint: &str) -> CachePolicy;
}

/// One dataset-backed report: which file it reads and how rows become a response.
pub trait Report: Send + Sync {
    type Output: Serialize + Send;

    fn name(&self) -> &'static str;
    fn source(&self) -> &str;
    fn build(&self, rows: Vec<DataRow>) -> Result<Self::Output>;
}
