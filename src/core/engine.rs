use crate::core::csv_rows::parse_rows;
use crate::domain::model::DataRow;
use crate::domain::ports::{Report, Storage};
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Instant;

/// Runs reports against a storage backend: read, parse, build.
#[derive(Clone)]
pub struct ReportEngine {
    storage: Arc<dyn Storage>,
}

impl ReportEngine {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub async fn load_rows(&self, source: &str) -> Result<Vec<DataRow>> {
        let bytes = self.storage.read_file(source).await?;
        let rows = parse_rows(&bytes)?;
        tracing::debug!("Parsed {} rows from {} ({} bytes)", rows.len(), source, bytes.len());
        Ok(rows)
    }

    pub async fn run<R: Report>(&self, report: &R) -> Result<R::Output> {
        let started = Instant::now();

        let rows = self.load_rows(report.source()).await?;
        let row_count = rows.len();
        let output = report.build(rows)?;

        tracing::info!(
            "Built {} report from {} rows in {:?}",
            report.name(),
            row_count,
            started.elapsed()
        );
        Ok(output)
    }
}
