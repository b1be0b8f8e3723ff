use crate::core::csv_rows::RawRow;
use crate::domain::model::{DataRow, FieldValue};

/// Best-effort numeric parse; anything that is not a finite number stays text.
pub fn coerce(raw: &str) -> FieldValue {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => FieldValue::Number(n),
        _ => FieldValue::Text(trimmed.to_string()),
    }
}

pub fn coerce_row(raw: RawRow) -> DataRow {
    DataRow::new(
        raw.into_iter()
            .map(|(name, value)| {
                let value = coerce(&value);
                (name, value)
            })
            .collect(),
    )
}
