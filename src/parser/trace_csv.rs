//! Raw detector trace reader.
//!
//! Reads a headered, comma-delimited export with at least a time column and
//! an intensity column. Extra columns are ignored; rows are kept in file order.

use super::schema::{Series, SeriesPoint, TraceColumns};
use crate::utils::error::LoadError;
use log::debug;
use std::path::Path;

/// Load one trace from a CSV file
///
/// **Public** - main entry point for series loading
///
/// # Arguments
/// * `path` - Trace file
/// * `columns` - Header names of the time and intensity columns
/// * `label` - Explicit display label; defaults to the file name
///
/// # Errors
/// * `LoadError::NotFound` - File does not exist
/// * `LoadError::Unreadable` - I/O or CSV framing error
/// * `LoadError::MissingColumn` - Required header absent
/// * `LoadError::InvalidValue` - Cell is not a finite number
pub fn load_series(
    path: impl AsRef<Path>,
    columns: &TraceColumns,
    label: Option<&str>,
) -> Result<Series, LoadError> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    debug!("Reading trace from: {}", path.display());

    let unreadable = |source| LoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(unreadable)?;

    let headers = reader.headers().map_err(unreadable)?.clone();
    let time_idx = column_index(&headers, &columns.time, path)?;
    let intensity_idx = column_index(&headers, &columns.intensity, path)?;

    let mut points = Vec::new();
    for (row_no, record) in reader.records().enumerate() {
        let record = record.map_err(unreadable)?;
        // Header is line 1
        let row = row_no + 2;

        let time = parse_cell(&record, time_idx, &columns.time, row, path)?;
        let intensity = parse_cell(&record, intensity_idx, &columns.intensity, row, path)?;
        points.push(SeriesPoint::new(time, intensity));
    }

    let label = label
        .map(str::to_string)
        .unwrap_or_else(|| derive_label(path));

    debug!("Loaded {} points for series '{}'", points.len(), label);

    Ok(Series {
        label,
        source: Some(path.to_path_buf()),
        points,
    })
}

/// Label used when none is configured: the file name, extension included
pub fn derive_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn column_index(headers: &csv::StringRecord, column: &str, path: &Path) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })
}

fn parse_cell(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
    row: usize,
    path: &Path,
) -> Result<f64, LoadError> {
    let raw = record.get(idx).unwrap_or("");

    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LoadError::InvalidValue {
            path: path.to_path_buf(),
            row,
            column: column.to_string(),
            value: raw.to_string(),
        })
}
