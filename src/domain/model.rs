use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// A single CSV cell after numeric coercion.
///
/// Whole numbers serialize as JSON integers, so `410000` stays `410000`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Display form; numbers drop a trailing `.0` so ids like `1` stay `1`.
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Number(n) => match whole_number(*n) {
                Some(i) => i.to_string(),
                None => n.to_string(),
            },
            Self::Text(s) => s.clone(),
        }
    }
}

fn whole_number(n: f64) -> Option<i64> {
    (n.fract() == 0.0 && n.abs() < 1e15).then_some(n as i64)
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Number(n) => match whole_number(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// One parsed CSV row. Column order follows the source header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataRow {
    fields: Vec<(String, FieldValue)>,
}

impl DataRow {
    pub fn new(fields: Vec<(String, FieldValue)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(FieldValue::as_f64)
    }

    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column).map(FieldValue::to_display_string)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for DataRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Per-zone coverage entry for the school, hospital and park datasets.
///
/// Serializes with the source CSV column names; `facility_column` is the
/// dataset-specific count column (`num_schools`, `num_facilities`, `num_parks`).
/// Cells that were not numeric serialize as `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSummary {
    pub zone_id: String,
    pub zone_name: String,
    pub coverage_score: Option<f64>,
    pub facility_column: &'static str,
    pub facilities: Option<f64>,
    pub label: String,
    pub status: String,
    pub extras: Vec<(String, FieldValue)>,
}

impl Serialize for ZoneSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(6 + self.extras.len()))?;
        map.serialize_entry("zone_id", &self.zone_id)?;
        map.serialize_entry("zone_name", &self.zone_name)?;
        map.serialize_entry(
            "predicted_coverage_score",
            &self.coverage_score.map(FieldValue::Number),
        )?;
        map.serialize_entry("coverage_label", &self.label)?;
        map.serialize_entry(self.facility_column, &self.facilities.map(FieldValue::Number))?;
        map.serialize_entry("status", &self.status)?;
        for (name, value) in &self.extras {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Ordered `(year, value)` readings for one metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricSeries {
    pub name: String,
    pub points: Vec<(i32, f64)>,
}

impl MetricSeries {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
        }
    }

    pub fn push(&mut self, year: i32, value: f64) {
        self.points.push((year, value));
    }

    pub fn years(&self) -> Vec<f64> {
        self.points.iter().map(|(year, _)| f64::from(*year)).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, value)| *value).collect()
    }

    pub fn first(&self) -> Option<(i32, f64)> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<(i32, f64)> {
        self.points.last().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub year: i32,
    pub value: f64,
}

/// `Cache-Control` policy attached to successful responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachePolicy {
    pub max_age: u32,
    pub stale_while_revalidate: u32,
}

impl CachePolicy {
    pub const fn new(max_age: u32, stale_while_revalidate: u32) -> Self {
        Self {
            max_age,
            stale_while_revalidate,
        }
    }

    pub fn header_value(&self) -> String {
        format!(
            "public, s-maxage={}, stale-while-revalidate={}",
            self.max_age, self.stale_while_revalidate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> DataRow {
        DataRow::new(vec![
            ("zone_id".to_string(), FieldValue::Number(1.0)),
            ("zone_name".to_string(), FieldValue::Text("Central".to_string())),
            ("score".to_string(), FieldValue::Number(72.5)),
        ])
    }

    #[test]
    fn test_data_row_keeps_header_order_in_json() {
        let json = serde_json::to_string(&row()).unwrap();
        assert_eq!(json, r#"{"zone_id":1,"zone_name":"Central","score":72.5}"#);
    }

    #[test]
    fn test_whole_numbers_serialize_as_integers() {
        let cells = [
            FieldValue::Number(410000.0),
            FieldValue::Number(-3.0),
            FieldValue::Number(0.25),
            FieldValue::Text("07".to_string()),
        ];
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, r#"[410000,-3,0.25,"07"]"#);
    }

    #[test]
    fn test_data_row_lookups() {
        let row = row();
        assert_eq!(row.number("score"), Some(72.5));
        assert_eq!(row.number("zone_name"), None);
        assert_eq!(row.text("zone_id").as_deref(), Some("1"));
        assert_eq!(row.text("missing"), None);
        assert_eq!(row.columns().collect::<Vec<_>>(), ["zone_id", "zone_name", "score"]);
    }

    #[test]
    fn test_zone_summary_uses_dataset_facility_column() {
        let zone = ZoneSummary {
            zone_id: "1".to_string(),
            zone_name: "North".to_string(),
            coverage_score: Some(64.2),
            facility_column: "num_facilities",
            facilities: Some(12.0),
            label: "Good Coverage".to_string(),
            status: "good".to_string(),
            extras: vec![("total_capacity".to_string(), FieldValue::Number(900.0))],
        };
        let value = serde_json::to_value(&zone).unwrap();
        assert!(value["num_facilities"].is_i64());
        assert_eq!(value["num_facilities"], 12);
        assert_eq!(value["predicted_coverage_score"], 64.2);
        assert_eq!(value["total_capacity"], 900.0);
        assert!(value.get("num_schools").is_none());
    }

    #[test]
    fn test_cache_policy_header() {
        assert_eq!(
            CachePolicy::new(300, 600).header_value(),
            "public, s-maxage=300, stale-while-revalidate=600"
        );
    }
}
