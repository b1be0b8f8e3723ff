use super::require_columns;
use crate::core::summary::{summarize, FieldSpec};
use crate::core::{DataRow, Report};
use crate::utils::error::Result;
use serde::Serialize;

const DENSITY: &str = "Avg_Density";
const HOUSING_UNITS: &str = "Total_Housing_Units";
const ROAD_LENGTH: &str = "Total_Road_Length_KM";
const CONGESTION: &str = "Congestion_Level";
const INFRASTRUCTURE: &str = "Infrastructure_Score";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetrics {
    pub r2_score: Option<f64>,
    pub mean_squared_error: Option<f64>,
    pub mean_absolute_error: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HousingRoadSummary {
    pub total_districts: usize,
    pub avg_density: f64,
    pub avg_infrastructure_score: f64,
    pub avg_congestion_level: f64,
    pub total_housing_units: i64,
    pub total_road_length: f64,
    pub model_metrics: ModelMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct HousingRoadResponse {
    pub data: Vec<DataRow>,
    pub summary: HousingRoadSummary,
}

/// District-level housing density against road network capacity.
pub struct HousingRoadReport {
    source: String,
}

impl HousingRoadReport {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl Report for HousingRoadReport {
    type Output = HousingRoadResponse;

    fn name(&self) -> &'static str {
        "housing-road-analysis"
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn build(&self, rows: Vec<DataRow>) -> Result<HousingRoadResponse> {
        require_columns(
            &self.source,
            &rows,
            &[DENSITY, HOUSING_UNITS, ROAD_LENGTH, CONGESTION, INFRASTRUCTURE],
        )?;

        let summary = summarize(
            &self.source,
            &rows,
            &[
                FieldSpec::rounded_mean(DENSITY),
                FieldSpec::percentage(INFRASTRUCTURE),
                FieldSpec::percentage(CONGESTION),
                FieldSpec::count(HOUSING_UNITS),
                FieldSpec::total(ROAD_LENGTH, 1),
            ],
        )?;

        // model metrics are written identically on every row
        let first = &rows[0];
        let model_metrics = ModelMetrics {
            r2_score: first.number("Model_R2_Score"),
            mean_squared_error: first.number("Model_MSE"),
            mean_absolute_error: first.number("Model_MAE"),
        };

        Ok(HousingRoadResponse {
            summary: HousingRoadSummary {
                total_districts: rows.len(),
                avg_density: summary.value(DENSITY),
                avg_infrastructure_score: summary.value(INFRASTRUCTURE),
                avg_congestion_level: summary.value(CONGESTION),
                total_housing_units: summary.value(HOUSING_UNITS) as i64,
                total_road_length: summary.value(ROAD_LENGTH),
                model_metrics,
            },
            data: rows,
        })
    }
}
