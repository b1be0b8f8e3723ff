//! Sustainable resource forecast.
//!
//! Each metric gets its own least-squares line over the historical years,
//! projected forward to the configured target year. Water readings arrive in
//! million gallons per day and are reported in million litres per day.

use super::require_columns;
use crate::core::summary::round_to;
use crate::core::trend::{Bounds, TrendModel};
use crate::core::{DataRow, MetricSeries, Report};
use crate::utils::error::{ForecastError, Result};
use serde::Serialize;

pub const LITRES_PER_GALLON: f64 = 3.785411784;

const YEAR: &str = "Year";
const WATER: &str = "Water_Consumption_MGD";
const ENERGY: &str = "Energy_Consumption_GWh";
const WASTE: &str = "Waste_Generated_Tonnes";
const EFFICIENCY: &str = "Resource_Efficiency_Index";
const SCORE: &str = "Sustainability_Score";

const FIRST_YEAR: i32 = 1800;
const LAST_YEAR: i32 = 2200;

/// Bounds and output precision for one forecast metric.
#[derive(Debug, Clone, Copy)]
struct MetricRule {
    column: &'static str,
    bounds: Bounds,
    decimals: u32,
}

const WATER_RULE: MetricRule = MetricRule {
    column: WATER,
    bounds: Bounds::NON_NEGATIVE,
    decimals: 1,
};
const ENERGY_RULE: MetricRule = MetricRule {
    column: ENERGY,
    bounds: Bounds::NON_NEGATIVE,
    decimals: 1,
};
const WASTE_RULE: MetricRule = MetricRule {
    column: WASTE,
    bounds: Bounds::NON_NEGATIVE,
    decimals: 1,
};
const EFFICIENCY_RULE: MetricRule = MetricRule {
    column: EFFICIENCY,
    bounds: Bounds::UNIT,
    decimals: 3,
};
const SCORE_RULE: MetricRule = MetricRule {
    column: SCORE,
    bounds: Bounds::PERCENT,
    decimals: 1,
};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoricalPoint {
    pub year: i32,
    pub water: Option<f64>,
    pub energy: Option<f64>,
    pub waste: Option<f64>,
    pub efficiency: Option<f64>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Predictions {
    pub years: Vec<i32>,
    pub water: Vec<f64>,
    pub energy: Vec<f64>,
    pub waste: Vec<f64>,
    pub efficiency: Vec<f64>,
    pub score: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SustainabilityResponse {
    pub historical: Vec<HistoricalPoint>,
    pub predictions: Predictions,
    pub insights: Vec<String>,
}

/// A fitted metric together with its clamping rule.
struct Projection {
    series: MetricSeries,
    model: TrendModel,
    rule: MetricRule,
}

impl Projection {
    fn fit(series: MetricSeries, rule: MetricRule) -> Result<Self> {
        let model = TrendModel::fit_series(&series)?;
        tracing::debug!(
            "{}: slope {:.4}, intercept {:.4}, r2 {:.3} over {} points",
            series.name,
            model.slope,
            model.intercept,
            model.r_squared,
            series.points.len()
        );
        Ok(Self {
            series,
            model,
            rule,
        })
    }

    fn at(&self, year: i32) -> f64 {
        round_to(
            self.rule.bounds.clamp(self.model.predict(f64::from(year))),
            self.rule.decimals,
        )
    }

    fn over(&self, years: &[i32]) -> Vec<f64> {
        self.model
            .forecast(years, Some(self.rule.bounds))
            .into_iter()
            .map(|point| round_to(point.value, self.rule.decimals))
            .collect()
    }
}

pub struct SustainabilityReport {
    source: String,
    target_year: i32,
    milestone_year: i32,
}

impl SustainabilityReport {
    pub fn new(source: impl Into<String>, target_year: i32, milestone_year: i32) -> Self {
        Self {
            source: source.into(),
            target_year,
            milestone_year,
        }
    }

    /// Rows with a numeric year, sorted by year. Water is converted to litres here.
    ///
    /// A year outside `FIRST_YEAR..=LAST_YEAR` fails the whole build rather
    /// than being skipped.
    fn historical(&self, rows: &[DataRow]) -> Result<Vec<HistoricalPoint>> {
        let mut points = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(year) = row.number(YEAR) else {
                continue;
            };
            let rounded = year.round();
            if !(f64::from(FIRST_YEAR)..=f64::from(LAST_YEAR)).contains(&rounded) {
                return Err(ForecastError::OutOfRange {
                    field: YEAR.to_string(),
                    value: year,
                    min: FIRST_YEAR.into(),
                    max: LAST_YEAR.into(),
                });
            }
            points.push(HistoricalPoint {
                year: rounded as i32,
                water: row.number(WATER).map(|mgd| mgd * LITRES_PER_GALLON),
                energy: row.number(ENERGY),
                waste: row.number(WASTE),
                efficiency: row.number(EFFICIENCY),
                score: row.number(SCORE),
            });
        }
        points.sort_by_key(|point| point.year);
        Ok(points)
    }

    fn series(
        historical: &[HistoricalPoint],
        rule: MetricRule,
        pick: fn(&HistoricalPoint) -> Option<f64>,
    ) -> MetricSeries {
        let mut series = MetricSeries::new(rule.column);
        for point in historical {
            if let Some(value) = pick(point) {
                series.push(point.year, value);
            }
        }
        series
    }

    fn insights(
        &self,
        water: &Projection,
        energy: &Projection,
        score: &Projection,
    ) -> Vec<String> {
        let target = self.target_year;
        let mut insights = Vec::with_capacity(3);

        if let Some((last_year, last)) = water.series.last() {
            let last = round_to(last, water.rule.decimals);
            let projected = water.at(target);
            insights.push(format!(
                "Water consumption is projected to {} from {:.1} MLD in {} to {:.1} MLD by {}.",
                direction(last, projected),
                last,
                last_year,
                projected,
                target
            ));
        }

        if let (Some((first_year, first)), Some((last_year, last))) =
            (energy.series.first(), energy.series.last())
        {
            let change = match percent_change(first, last) {
                Some(pct) => format!("changed by {:+.1}%", pct),
                None => format!("moved from {:.1} to {:.1} GWh", first, last),
            };
            insights.push(format!(
                "Energy use {} between {} and {}; the trend points to {:.1} GWh in {}.",
                change,
                first_year,
                last_year,
                energy.at(target),
                target
            ));
        }

        insights.push(format!(
            "The sustainability score is forecast at {:.1} in {} and {:.1} by {}.",
            score.at(self.milestone_year),
            self.milestone_year,
            score.at(target),
            target
        ));

        insights
    }
}

fn direction(from: f64, to: f64) -> &'static str {
    if to > from {
        "rise"
    } else if to < from {
        "fall"
    } else {
        "hold steady"
    }
}

fn percent_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        None
    } else {
        Some((to - from) / from * 100.0)
    }
}

impl Report for SustainabilityReport {
    type Output = SustainabilityResponse;

    fn name(&self) -> &'static str {
        "sustainable-resources"
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn build(&self, rows: Vec<DataRow>) -> Result<SustainabilityResponse> {
        require_columns(
            &self.source,
            &rows,
            &[YEAR, WATER, ENERGY, WASTE, EFFICIENCY, SCORE],
        )?;

        let historical = self.historical(&rows)?;
        let last_year = historical
            .last()
            .map(|point| point.year)
            .ok_or_else(|| ForecastError::NoUsableValues {
                field: YEAR.to_string(),
            })?;

        let water = Projection::fit(Self::series(&historical, WATER_RULE, |p| p.water), WATER_RULE)?;
        let energy = Projection::fit(Self::series(&historical, ENERGY_RULE, |p| p.energy), ENERGY_RULE)?;
        let waste = Projection::fit(Self::series(&historical, WASTE_RULE, |p| p.waste), WASTE_RULE)?;
        let efficiency = Projection::fit(
            Self::series(&historical, EFFICIENCY_RULE, |p| p.efficiency),
            EFFICIENCY_RULE,
        )?;
        let score = Projection::fit(Self::series(&historical, SCORE_RULE, |p| p.score), SCORE_RULE)?;

        let first_forecast = last_year.checked_add(1).ok_or_else(|| ForecastError::OutOfRange {
            field: YEAR.to_string(),
            value: f64::from(last_year),
            min: FIRST_YEAR.into(),
            max: LAST_YEAR.into(),
        })?;
        let years: Vec<i32> = (first_forecast..=self.target_year).collect();
        let predictions = Predictions {
            water: water.over(&years),
            energy: energy.over(&years),
            waste: waste.over(&years),
            efficiency: efficiency.over(&years),
            score: score.over(&years),
            years,
        };
        let insights = self.insights(&water, &energy, &score);

        Ok(SustainabilityResponse {
            historical,
            predictions,
            insights,
        })
    }
}
