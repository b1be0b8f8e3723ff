use super::require_columns;
use crate::core::summary::{round_to, summarize, FieldSpec};
use crate::core::{DataRow, Report};
use crate::utils::error::Result;
use serde::Serialize;

const TRAFFIC: (&str, &str) = ("Traffic_Efficiency_Before", "Traffic_Efficiency_After");
const COMMUTE: (&str, &str) = ("Commute_Before", "Commute_After");
const HOUSING_ACCESS: (&str, &str) = ("Housing_Access_Before", "Housing_Access_After");
const INFRA_UTIL: (&str, &str) = ("Infra_Util_Before", "Infra_Util_After");
const POLLUTION: (&str, &str) = ("Pollution_Index_Before", "Pollution_Index_After");

const PAIRS: [(&str, &str); 5] = [TRAFFIC, COMMUTE, HOUSING_ACCESS, INFRA_UTIL, POLLUTION];

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct BeforeAfter {
    pub before: f64,
    pub after: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningSummary {
    pub total_zones: usize,
    pub traffic_efficiency: BeforeAfter,
    pub commute_time: BeforeAfter,
    pub housing_access: BeforeAfter,
    pub infra_utilization: BeforeAfter,
    pub pollution_index: BeforeAfter,
}

/// Positive values are improvements in every field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Improvements {
    pub traffic_improvement: f64,
    pub commute_reduction: f64,
    pub housing_access_gain: f64,
    pub infra_gain: f64,
    pub pollution_reduction: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanningImpactResponse {
    pub data: Vec<DataRow>,
    pub summary: PlanningSummary,
    pub improvements: Improvements,
}

pub struct PlanningImpactReport {
    source: String,
}

impl PlanningImpactReport {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl Report for PlanningImpactReport {
    type Output = PlanningImpactResponse;

    fn name(&self) -> &'static str {
        "ai-planning-impact"
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn build(&self, rows: Vec<DataRow>) -> Result<PlanningImpactResponse> {
        let columns: Vec<&'static str> = PAIRS.iter().flat_map(|(b, a)| [*b, *a]).collect();
        require_columns(&self.source, &rows, &columns)?;

        let specs: Vec<FieldSpec> = columns.iter().map(|&c| FieldSpec::mean(c)).collect();
        let means = summarize(&self.source, &rows, &specs)?;

        let pair = |(before, after): (&str, &str)| BeforeAfter {
            before: round_to(means.value(before), 1),
            after: round_to(means.value(after), 1),
        };
        // deltas come from exact means so rounding happens once
        let gain = |(before, after): (&str, &str)| round_to(means.value(after) - means.value(before), 1);
        let reduction = |(before, after): (&str, &str)| round_to(means.value(before) - means.value(after), 1);

        Ok(PlanningImpactResponse {
            summary: PlanningSummary {
                total_zones: rows.len(),
                traffic_efficiency: pair(TRAFFIC),
                commute_time: pair(COMMUTE),
                housing_access: pair(HOUSING_ACCESS),
                infra_utilization: pair(INFRA_UTIL),
                pollution_index: pair(POLLUTION),
            },
            improvements: Improvements {
                traffic_improvement: gain(TRAFFIC),
                commute_reduction: reduction(COMMUTE),
                housing_access_gain: gain(HOUSING_ACCESS),
                infra_gain: gain(INFRA_UTIL),
                pollution_reduction: reduction(POLLUTION),
            },
            data: rows,
        })
    }
}
