//! School, hospital and park coverage reports.

use super::require_columns;
use crate::core::summary::{summarize, FieldSpec};
use crate::core::{DataRow, Report, ZoneSummary};
use crate::utils::error::Result;
use serde::Serialize;

const ZONE_ID: &str = "zone_id";
const ZONE_NAME: &str = "zone_name";
const SCORE: &str = "predicted_coverage_score";
const LABEL: &str = "coverage_label";
const STATUS: &str = "status";

/// Which coverage dataset a report reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageDataset {
    pub name: &'static str,
    pub source: String,
    pub facility_column: &'static str,
}

impl CoverageDataset {
    pub fn school(source: impl Into<String>) -> Self {
        Self {
            name: "school-coverage",
            source: source.into(),
            facility_column: "num_schools",
        }
    }

    pub fn hospital(source: impl Into<String>) -> Self {
        Self {
            name: "hospital-coverage",
            source: source.into(),
            facility_column: "num_facilities",
        }
    }

    pub fn park(source: impl Into<String>) -> Self {
        Self {
            name: "park-coverage",
            source: source.into(),
            facility_column: "num_parks",
        }
    }
}

pub fn coverage_label(score: f64) -> &'static str {
    if score >= 80.0 {
        "Excellent Coverage"
    } else if score >= 60.0 {
        "Good Coverage"
    } else {
        "Needs Improvement"
    }
}

pub fn coverage_status(score: f64) -> &'static str {
    if score >= 80.0 {
        "excellent"
    } else if score >= 60.0 {
        "good"
    } else {
        "needs-improvement"
    }
}

fn non_empty_text(row: &DataRow, column: &str) -> Option<String> {
    row.text(column).filter(|s| !s.is_empty())
}

/// Maps each row onto a [`ZoneSummary`]; columns outside the core set are kept as extras.
pub fn zone_summaries(dataset: &CoverageDataset, rows: &[DataRow]) -> Result<Vec<ZoneSummary>> {
    require_columns(
        &dataset.source,
        rows,
        &[ZONE_ID, ZONE_NAME, SCORE, dataset.facility_column],
    )?;

    let core = [ZONE_ID, ZONE_NAME, SCORE, LABEL, STATUS, dataset.facility_column];

    Ok(rows
        .iter()
        .map(|row| {
            let coverage_score = row.number(SCORE);
            let label = non_empty_text(row, LABEL).unwrap_or_else(|| {
                coverage_score.map_or_else(String::new, |s| coverage_label(s).to_string())
            });
            let status = non_empty_text(row, STATUS).unwrap_or_else(|| {
                coverage_score.map_or_else(String::new, |s| coverage_status(s).to_string())
            });

            ZoneSummary {
                zone_id: row.text(ZONE_ID).unwrap_or_default(),
                zone_name: row.text(ZONE_NAME).unwrap_or_default(),
                coverage_score,
                facility_column: dataset.facility_column,
                facilities: row.number(dataset.facility_column),
                label,
                status,
                extras: row
                    .iter()
                    .filter(|(name, _)| !core.contains(name))
                    .map(|(name, value)| (name.to_string(), value.clone()))
                    .collect(),
            }
        })
        .collect())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageResponse {
    pub coverage: i64,
    pub total_facilities: i64,
    pub status: String,
    pub label: String,
    pub zones: Vec<ZoneSummary>,
}

/// School or hospital coverage headline plus per-zone detail.
pub struct CoverageReport {
    dataset: CoverageDataset,
}

impl CoverageReport {
    pub fn new(dataset: CoverageDataset) -> Self {
        Self { dataset }
    }
}

impl Report for CoverageReport {
    type Output = CoverageResponse;

    fn name(&self) -> &'static str {
        self.dataset.name
    }

    fn source(&self) -> &str {
        &self.dataset.source
    }

    fn build(&self, rows: Vec<DataRow>) -> Result<CoverageResponse> {
        let zones = zone_summaries(&self.dataset, &rows)?;
        let summary = summarize(
            &self.dataset.source,
            &rows,
            &[
                FieldSpec::rounded_mean(SCORE),
                FieldSpec::count(self.dataset.facility_column),
            ],
        )?;

        let coverage = summary.value(SCORE);
        // The headline label follows the first zone, as the dashboard expects.
        let label = zones
            .first()
            .map(|zone| zone.label.clone())
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| coverage_label(coverage).to_string());

        Ok(CoverageResponse {
            coverage: coverage as i64,
            total_facilities: summary.value(self.dataset.facility_column) as i64,
            status: coverage_status(coverage).to_string(),
            label,
            zones,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ParkSummary {
    #[serde(rename = "totalZones")]
    pub total_zones: usize,
    #[serde(rename = "totalParks")]
    pub total_parks: i64,
    #[serde(rename = "avgUGBI")]
    pub avg_ugbi: f64,
    #[serde(rename = "avgProgressWHO")]
    pub avg_progress_who: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParkCoverageResponse {
    pub zones: Vec<ZoneSummary>,
    pub summary: ParkSummary,
}

pub struct ParkCoverageReport {
    dataset: CoverageDataset,
}

impl ParkCoverageReport {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            dataset: CoverageDataset::park(source),
        }
    }
}

impl Report for ParkCoverageReport {
    type Output = ParkCoverageResponse;

    fn name(&self) -> &'static str {
        self.dataset.name
    }

    fn source(&self) -> &str {
        &self.dataset.source
    }

    fn build(&self, rows: Vec<DataRow>) -> Result<ParkCoverageResponse> {
        let zones = zone_summaries(&self.dataset, &rows)?;
        let summary = summarize(
            &self.dataset.source,
            &rows,
            &[
                FieldSpec::count("num_parks"),
                FieldSpec::percentage("urban_green_balance_index"),
                FieldSpec::percentage("progress_to_who"),
            ],
        )?;

        Ok(ParkCoverageResponse {
            summary: ParkSummary {
                total_zones: zones.len(),
                total_parks: summary.value("num_parks") as i64,
                avg_ugbi: summary.value("urban_green_balance_index"),
                avg_progress_who: summary.value("progress_to_who"),
            },
            zones,
        })
    }
}
