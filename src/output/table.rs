//! Delimited export of the merged table.
//!
//! Header row = column names, one data row per merged time value, absent
//! values as empty fields. Numbers use the shortest round-trip formatting so
//! identical inputs give byte-identical files.

use super::overwrite::WriteMode;
use crate::aggregator::MergedTable;
use crate::utils::config::{OFFSET_PREFIX, TIME_HEADER};
use crate::utils::error::OutputError;
use log::{debug, info};
use std::path::Path;

/// Write a merged table as CSV
///
/// **Public** - main entry point for table export
///
/// # Arguments
/// * `table` - Merged table
/// * `output_path` - Destination file
/// * `mode` - Result of `check_destination` for this path
///
/// # Errors
/// * `OutputError::DestinationExists` - `CreateNew` and the file exists
/// * `OutputError::Csv` / `OutputError::WriteFailed` - I/O during write
/// * `OutputError::InvalidPath` - Path is empty, a directory, or its parent cannot be created
pub fn write_merged_table(
    table: &MergedTable,
    output_path: impl AsRef<Path>,
    mode: WriteMode,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing merged table to: {}", output_path.display());

    let file = super::open_destination(output_path, mode)?;
    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(table.headers())?;
    for (time, values) in table.rows() {
        let record = std::iter::once(format_value(Some(time)))
            .chain(values.into_iter().map(format_value));
        writer.write_record(record)?;
    }
    writer.flush()?;

    info!(
        "Table written successfully ({} rows x {} columns)",
        table.len(),
        table.column_count()
    );

    Ok(())
}

fn format_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// The offset columns of a previously exported table
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetTable {
    pub times: Vec<f64>,
    pub columns: Vec<OffsetColumn>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OffsetColumn {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

impl OffsetTable {
    /// Points of one column, `None` where the cell was empty
    pub fn points(&self, column: &OffsetColumn) -> Vec<(f64, Option<f64>)> {
        self.times.iter().copied().zip(column.values.iter().copied()).collect()
    }
}

/// Read the time column and every offset column of an exported table
///
/// # Errors
/// * `OutputError::Csv` - File missing or unreadable
/// * `OutputError::MalformedTable` - No time column, no offset columns, or a bad cell
pub fn read_offset_table(input_path: impl AsRef<Path>) -> Result<OffsetTable, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading merged table from: {}", input_path.display());

    let malformed = |reason: String| OutputError::MalformedTable {
        path: input_path.to_path_buf(),
        reason,
    };

    let mut reader = csv::Reader::from_path(input_path)?;
    let headers = reader.headers()?.clone();

    let time_idx = headers
        .iter()
        .position(|h| h == TIME_HEADER)
        .ok_or_else(|| malformed(format!("no '{}' column", TIME_HEADER)))?;

    let offset_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, h)| offset_label(h).map(|label| (idx, label.to_string())))
        .collect();

    if offset_cols.is_empty() {
        return Err(malformed(format!("no '{}' columns", OFFSET_PREFIX)));
    }

    let mut times = Vec::new();
    let mut columns: Vec<OffsetColumn> = offset_cols
        .iter()
        .map(|(_, label)| OffsetColumn {
            label: label.clone(),
            values: Vec::new(),
        })
        .collect();

    for (row_no, record) in reader.records().enumerate() {
        let record = record?;
        let row = row_no + 2;

        let time = match parse_optional(record.get(time_idx).unwrap_or("")) {
            Ok(Some(t)) => t,
            _ => return Err(malformed(format!("row {}: invalid time value", row))),
        };
        times.push(time);

        for ((idx, label), column) in offset_cols.iter().zip(columns.iter_mut()) {
            let value = parse_optional(record.get(*idx).unwrap_or(""))
                .map_err(|raw| malformed(format!("row {}, series '{}': '{}' is not a number", row, label, raw)))?;
            column.values.push(value);
        }
    }

    debug!(
        "Loaded {} rows and {} offset columns",
        times.len(),
        columns.len()
    );

    Ok(OffsetTable { times, columns })
}

/// `Normalized Intensity (Offset) (label)` -> `label`
fn offset_label(header: &str) -> Option<&str> {
    header
        .strip_prefix(OFFSET_PREFIX)?
        .strip_prefix(" (")?
        .strip_suffix(')')
}

fn parse_optional(raw: &str) -> Result<Option<f64>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_label() {
        assert_eq!(offset_label("Normalized Intensity (Offset) (run (05).csv)"), Some("run (05).csv"));
        assert_eq!(offset_label("Normalized Intensity (run.csv)"), None);
        assert_eq!(offset_label("Time (min)"), None);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Some(210.0)), "210");
        assert_eq!(format_value(Some(10.5)), "10.5");
        assert_eq!(format_value(None), "");
    }

    #[test]
    fn test_parse_optional() {
        assert_eq!(parse_optional(""), Ok(None));
        assert_eq!(parse_optional(" 1.5 "), Ok(Some(1.5)));
        assert!(parse_optional("x").is_err());
    }
}
