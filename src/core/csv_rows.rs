//! CSV text to ordered header/value rows.

use crate::core::coercion::coerce_row;
use crate::domain::model::DataRow;
use crate::utils::error::Result;
use crate::utils::error::ForecastError;
use csv::{ReaderBuilder, StringRecord, Trim};
use regex::Regex;

/// Raw row: `(header, value)` pairs in header order, values unparsed.
pub type RawRow = Vec<(String, String)>;

/// Parses CSV text into raw rows.
///
/// Every non-empty line is read as its own record, so an unbalanced quote
/// only affects the line it appears on. The header is the first non-empty
/// line. Quoted fields may contain commas and may be padded with spaces on
/// either side; the quotes are not kept. Short rows are padded with empty
/// strings and cells beyond the header width are ignored.
pub fn parse_raw_rows(text: &str) -> Result<Vec<RawRow>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Ok(Vec::new());
    };

    let padding = QuotePadding::new()?;
    let headers = padding.split(header_line)?;

    let mut rows = Vec::new();
    for line in lines {
        let cells = padding.split(line)?;
        let row = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), cells.get(i).cloned().unwrap_or_default()))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Strips spaces between a delimiter and a quote so the reader sees the
/// quote as the start (or end) of the field.
struct QuotePadding {
    before_open: Regex,
    after_close: Regex,
}

impl QuotePadding {
    fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| ForecastError::ConfigError {
                message: format!("Invalid quote pattern: {}", e),
            })
        };
        Ok(Self {
            before_open: compile(r#"(^|,)[ \t]+""#)?,
            after_close: compile(r#""[ \t]+(,|$)"#)?,
        })
    }

    /// Reads one line as a single record.
    fn split(&self, line: &str) -> Result<Vec<String>> {
        let line = self.before_open.replace_all(line, "${1}\"");
        let line = self.after_close.replace_all(&line, "\"${1}");

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(line.as_bytes());

        let mut record = StringRecord::new();
        reader.read_record(&mut record)?;
        Ok(record.iter().map(str::to_string).collect())
    }
}

/// Parses CSV bytes straight into coerced [`DataRow`]s.
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<DataRow>> {
    let text = String::from_utf8_lossy(bytes);
    let rows = parse_raw_rows(&text)?;
    Ok(rows.into_iter().map(coerce_row).collect())
}
