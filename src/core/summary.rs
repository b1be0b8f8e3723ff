//! Column aggregates over parsed rows.
//!
//! Cells that did not coerce to a number are counted as `skipped` and left
//! out of both the sum and the divisor.

use crate::domain::model::DataRow;
use crate::utils::error::{ForecastError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldStats {
    pub field: String,
    pub sum: f64,
    pub count: usize,
    pub skipped: usize,
}

impl FieldStats {
    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Mean,
    Sum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Exact,
    Decimals(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: &'static str,
    pub aggregate: Aggregate,
    pub rounding: Rounding,
}

impl FieldSpec {
    pub const fn mean(field: &'static str) -> Self {
        Self {
            field,
            aggregate: Aggregate::Mean,
            rounding: Rounding::Exact,
        }
    }

    /// Mean rounded to one decimal place.
    pub const fn percentage(field: &'static str) -> Self {
        Self {
            field,
            aggregate: Aggregate::Mean,
            rounding: Rounding::Decimals(1),
        }
    }

    /// Mean rounded to the nearest integer.
    pub const fn rounded_mean(field: &'static str) -> Self {
        Self {
            field,
            aggregate: Aggregate::Mean,
            rounding: Rounding::Decimals(0),
        }
    }

    /// Sum rounded to the nearest integer.
    pub const fn count(field: &'static str) -> Self {
        Self {
            field,
            aggregate: Aggregate::Sum,
            rounding: Rounding::Decimals(0),
        }
    }

    pub const fn total(field: &'static str, decimals: u32) -> Self {
        Self {
            field,
            aggregate: Aggregate::Sum,
            rounding: Rounding::Decimals(decimals),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    values: Vec<(&'static str, f64)>,
    skipped: Vec<(&'static str, usize)>,
}

impl Summary {
    pub fn get(&self, field: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| *value)
    }

    /// Like [`Summary::get`] but for fields the caller itself requested.
    pub fn value(&self, field: &str) -> f64 {
        self.get(field).unwrap_or_default()
    }

    pub fn skipped(&self, field: &str) -> usize {
        self.skipped
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn total_skipped(&self) -> usize {
        self.skipped.iter().map(|(_, n)| n).sum()
    }
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

pub fn field_stats(source: &str, rows: &[DataRow], field: &str) -> Result<FieldStats> {
    if rows.is_empty() {
        return Err(ForecastError::NoRows {
            source_name: source.to_string(),
        });
    }

    let mut stats = FieldStats {
        field: field.to_string(),
        sum: 0.0,
        count: 0,
        skipped: 0,
    };
    for row in rows {
        match row.number(field) {
            Some(value) => {
                stats.sum += value;
                stats.count += 1;
            }
            None => stats.skipped += 1,
        }
    }

    if stats.count == 0 {
        return Err(ForecastError::NoUsableValues {
            field: field.to_string(),
        });
    }

    Ok(stats)
}

pub fn summarize(source: &str, rows: &[DataRow], specs: &[FieldSpec]) -> Result<Summary> {
    let mut summary = Summary::default();

    for spec in specs {
        let stats = field_stats(source, rows, spec.field)?;
        let raw = match spec.aggregate {
            Aggregate::Mean => stats.mean(),
            Aggregate::Sum => stats.sum,
        };
        let value = match spec.rounding {
            Rounding::Exact => raw,
            Rounding::Decimals(d) => round_to(raw, d),
        };

        if stats.skipped > 0 {
            tracing::debug!(
                "{}: {} of {} values in '{}' were not numeric",
                source,
                stats.skipped,
                rows.len(),
                stats.field
            );
        }

        summary.values.push((spec.field, value));
        summary.skipped.push((spec.field, stats.skipped));
    }

    if summary.total_skipped() > 0 {
        tracing::info!(
            "{}: left {} non-numeric cells out of the summary",
            source,
            summary.total_skipped()
        );
    }

    Ok(summary)
}
