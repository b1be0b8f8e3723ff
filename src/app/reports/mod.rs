//! Dataset reports. Each one names its CSV source and shapes parsed rows
//! into the JSON payload for one dashboard endpoint.

pub mod ai_planning;
pub mod coverage;
pub mod housing_road;
pub mod infrastructure;
pub mod sustainability;

use crate::domain::model::DataRow;
use crate::utils::error::{ForecastError, Result};

pub(crate) fn require_rows(source: &str, rows: &[DataRow]) -> Result<()> {
    if rows.is_empty() {
        return Err(ForecastError::NoRows {
            source_name: source.to_string(),
        });
    }
    Ok(())
}

/// Checks the header (taken from the first row) carries every column.
pub(crate) fn require_columns(source: &str, rows: &[DataRow], columns: &[&str]) -> Result<()> {
    require_rows(source, rows)?;
    let first = &rows[0];
    for column in columns {
        if first.get(column).is_none() {
            return Err(ForecastError::MissingColumn {
                column: column.to_string(),
            });
        }
    }
    Ok(())
}
