pub mod coercion;
pub mod csv_rows;
pub mod engine;
pub mod summary;
pub mod trend;

pub use crate::domain::model::{DataRow, FieldValue, ForecastPoint, MetricSeries, ZoneSummary};
pub use crate::domain::ports::{ConfigProvider, Report, Storage};
pub use crate::utils::error::Result;
