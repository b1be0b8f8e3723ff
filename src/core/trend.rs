//! Ordinary least squares trend lines for yearly metric series.

use crate::domain::model::{ForecastPoint, MetricSeries};
use crate::utils::error::{ForecastError, Result};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendModel {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Inclusive range a forecast value is clamped into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const NON_NEGATIVE: Bounds = Bounds {
        min: 0.0,
        max: f64::INFINITY,
    };
    pub const UNIT: Bounds = Bounds { min: 0.0, max: 1.0 };
    pub const PERCENT: Bounds = Bounds {
        min: 0.0,
        max: 100.0,
    };

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl TrendModel {
    /// Fits `y = slope * x + intercept`.
    ///
    /// Needs equal-length inputs with at least two points and at least two
    /// distinct x values.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(ForecastError::LengthMismatch {
                x: xs.len(),
                y: ys.len(),
            });
        }
        if xs.len() < 2 {
            return Err(ForecastError::InsufficientPoints {
                needed: 2,
                got: xs.len(),
            });
        }

        let n = xs.len() as f64;
        let sum_x: f64 = xs.iter().sum();
        let sum_y: f64 = ys.iter().sum();
        let sum_xy: f64 = xs.iter().zip(ys).map(|(x, y)| x * y).sum();
        let sum_xx: f64 = xs.iter().map(|x| x * x).sum();

        let denominator = n * sum_xx - sum_x * sum_x;
        let mean_x = sum_x / n;
        let spread = xs.iter().map(|x| (x - mean_x).abs()).fold(0.0, f64::max);
        if denominator == 0.0 || spread == 0.0 {
            return Err(ForecastError::DegenerateInput);
        }

        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;

        let mean_y = sum_y / n;
        let ss_tot: f64 = ys.iter().map(|y| (y - mean_y).powi(2)).sum();
        let ss_res: f64 = xs
            .iter()
            .zip(ys)
            .map(|(x, y)| (y - (slope * x + intercept)).powi(2))
            .sum();
        let r_squared = if ss_tot == 0.0 { 1.0 } else { 1.0 - ss_res / ss_tot };

        Ok(Self {
            slope,
            intercept,
            r_squared,
        })
    }

    pub fn fit_series(series: &MetricSeries) -> Result<Self> {
        Self::fit(&series.years(), &series.values())
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Evaluates the line at each year, clamping into `bounds` when given.
    pub fn forecast(&self, years: &[i32], bounds: Option<Bounds>) -> Vec<ForecastPoint> {
        years
            .iter()
            .map(|&year| {
                let value = self.predict(f64::from(year));
                ForecastPoint {
                    year,
                    value: bounds.map_or(value, |b| b.clamp(value)),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_exact_line() {
        let model = TrendModel::fit(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();

        assert!(approx(model.slope, 2.0));
        assert!(approx(model.intercept, 0.0));
        assert!(approx(model.r_squared, 1.0));
        assert!(approx(model.predict(10.0), 20.0));
    }

    #[test]
    fn test_year_scale_series() {
        let mut series = MetricSeries::new("water");
        for (i, year) in (2015..=2024).enumerate() {
            series.push(year, 900.0 + 12.5 * i as f64);
        }
        let model = TrendModel::fit_series(&series).unwrap();

        assert!((model.slope - 12.5).abs() < 1e-6);
        assert!((model.predict(2030.0) - (900.0 + 12.5 * 15.0)).abs() < 1e-6);
    }

    #[test]
    fn test_noisy_fit_has_partial_r_squared() {
        let model = TrendModel::fit(&[1.0, 2.0, 3.0, 4.0], &[1.0, 3.0, 2.0, 5.0]).unwrap();
        assert!(model.r_squared > 0.0 && model.r_squared < 1.0);
        assert!(approx(model.slope, 1.1));
    }

    #[test]
    fn test_gaps_are_tolerated() {
        let model = TrendModel::fit(&[2010.0, 2013.0, 2020.0], &[10.0, 13.0, 20.0]).unwrap();
        assert!((model.slope - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_identical_x_is_rejected() {
        let err = TrendModel::fit(&[2020.0, 2020.0, 2020.0], &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, ForecastError::DegenerateInput));
    }

    #[test]
    fn test_bad_shapes_are_rejected() {
        assert!(matches!(
            TrendModel::fit(&[1.0], &[1.0]).unwrap_err(),
            ForecastError::InsufficientPoints { needed: 2, got: 1 }
        ));
        assert!(matches!(
            TrendModel::fit(&[1.0, 2.0], &[1.0]).unwrap_err(),
            ForecastError::LengthMismatch { x: 2, y: 1 }
        ));
    }

    #[test]
    fn test_forecast_clamps_after_evaluation() {
        let model = TrendModel::fit(&[2020.0, 2021.0, 2022.0], &[0.90, 0.95, 1.00]).unwrap();
        let points = model.forecast(&[2023, 2024], Some(Bounds::UNIT));

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].year, 2023);
        assert_eq!(points[0].value, 1.0);
        assert_eq!(points[1].value, 1.0);

        let unclamped = model.forecast(&[2024], None);
        assert!(unclamped[0].value > 1.0);
    }
}
