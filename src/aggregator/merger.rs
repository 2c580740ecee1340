//! Outer-join merge of stacked series on their time axis.
//!
//! The merged time axis is the sorted union of every time value seen in any
//! input; a value repeated inside one series repeats on the axis. Each
//! series contributes three columns (original, normalized, offset); rows
//! where a series has no sample hold `None`, never zero. Column groups
//! follow input order.

use super::stacker::StackedSeries;
use crate::utils::config::{NORMALIZED_PREFIX, OFFSET_PREFIX, ORIGINAL_PREFIX};
use crate::utils::error::MergeError;
use log::debug;
use std::collections::HashSet;

/// What counts as "the same time value" across series
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TimeMatch {
    /// Bit-for-bit equal `f64` (with `-0.0 == 0.0`)
    #[default]
    Exact,

    /// Times within this distance of a row's first time share that row
    Tolerance(f64),
}

impl TimeMatch {
    /// Zero tolerance is exact matching
    pub fn from_tolerance(tolerance: f64) -> Self {
        if tolerance > 0.0 {
            TimeMatch::Tolerance(tolerance)
        } else {
            TimeMatch::Exact
        }
    }
}

/// Which derived quantity a merged column holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Original,
    Normalized,
    Offset,
}

impl ColumnKind {
    pub const ALL: [ColumnKind; 3] = [ColumnKind::Original, ColumnKind::Normalized, ColumnKind::Offset];

    pub fn prefix(self) -> &'static str {
        match self {
            ColumnKind::Original => ORIGINAL_PREFIX,
            ColumnKind::Normalized => NORMALIZED_PREFIX,
            ColumnKind::Offset => OFFSET_PREFIX,
        }
    }

    /// Header text, e.g. `Normalized Intensity (Offset) (run1.csv)`
    pub fn header(self, label: &str) -> String {
        format!("{} ({})", self.prefix(), label)
    }
}

/// One value column of the merged table
#[derive(Debug, Clone, PartialEq)]
pub struct MergedColumn {
    pub label: String,
    pub kind: ColumnKind,

    /// One entry per merged row; `None` where the series has no sample
    pub values: Vec<Option<f64>>,
}

impl MergedColumn {
    pub fn header(&self) -> String {
        self.kind.header(&self.label)
    }
}

/// Wide table produced by [`merge`]
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTable {
    /// Row keys in non-decreasing order
    pub times: Vec<f64>,

    pub columns: Vec<MergedColumn>,
}

impl MergedTable {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time column plus three columns per series
    pub fn column_count(&self) -> usize {
        1 + self.columns.len()
    }

    pub fn headers(&self) -> Vec<String> {
        std::iter::once(crate::utils::config::TIME_HEADER.to_string())
            .chain(self.columns.iter().map(MergedColumn::header))
            .collect()
    }

    /// Series labels in column order
    pub fn labels(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Original)
            .map(|c| c.label.as_str())
            .collect()
    }

    pub fn column(&self, label: &str, kind: ColumnKind) -> Option<&MergedColumn> {
        self.columns
            .iter()
            .find(|c| c.kind == kind && c.label == label)
    }

    /// Value at the first row whose key equals `time`
    pub fn value(&self, label: &str, kind: ColumnKind, time: f64) -> Option<f64> {
        let row = self.times.iter().position(|&t| t == time)?;
        self.column(label, kind)?.values[row]
    }

    /// Iterate rows as `(time, values in column order)`
    pub fn rows(&self) -> impl Iterator<Item = (f64, Vec<Option<f64>>)> + '_ {
        self.times.iter().enumerate().map(move |(row, &time)| {
            (time, self.columns.iter().map(|c| c.values[row]).collect())
        })
    }
}

/// Reject label sets that would produce duplicate column names
///
/// # Errors
/// * `MergeError::LabelCollision` - Names the first repeated label
pub fn ensure_unique_labels<'a>(
    labels: impl IntoIterator<Item = &'a str>,
) -> Result<(), MergeError> {
    let mut seen = HashSet::new();
    for label in labels {
        if !seen.insert(label) {
            return Err(MergeError::LabelCollision(label.to_string()));
        }
    }
    Ok(())
}

/// Merge stacked series into one wide table
///
/// **Public** - main entry point for merging
///
/// A time value repeated within one series gets one row per occurrence: the
/// n-th sample at time t of every series shares row (t, n). Every sample is
/// kept, so the row count is at least the length of each series.
///
/// # Arguments
/// * `series` - Series in the order their column groups should appear
/// * `policy` - Time matching policy
///
/// # Errors
/// * `MergeError::NoSeries` - Empty input
/// * `MergeError::LabelCollision` - Two series share a label
pub fn merge(series: &[StackedSeries], policy: TimeMatch) -> Result<MergedTable, MergeError> {
    if series.is_empty() {
        return Err(MergeError::NoSeries);
    }
    ensure_unique_labels(series.iter().map(|s| s.label.as_str()))?;

    let keys = row_keys(series, policy);

    // (key index, occurrence) per point, and the most occurrences of each key
    let mut rows_per_key = vec![0usize; keys.len()];
    let slots: Vec<Vec<(usize, usize)>> = series
        .iter()
        .map(|s| {
            let mut seen = vec![0usize; keys.len()];
            let assigned = s
                .points
                .iter()
                .map(|p| {
                    let key = row_of(&keys, canonical(p.time));
                    let occurrence = seen[key];
                    seen[key] += 1;
                    (key, occurrence)
                })
                .collect();
            for (rows, count) in rows_per_key.iter_mut().zip(&seen) {
                *rows = (*rows).max(*count);
            }
            assigned
        })
        .collect();

    let mut first_row = Vec::with_capacity(keys.len());
    let mut times = Vec::new();
    for (&key, &count) in keys.iter().zip(&rows_per_key) {
        first_row.push(times.len());
        times.extend(std::iter::repeat(key).take(count));
    }

    debug!(
        "Merging {} series onto {} rows from {} distinct times ({:?})",
        series.len(),
        times.len(),
        keys.len(),
        policy
    );

    let mut columns = Vec::with_capacity(series.len() * 3);
    for (s, assigned) in series.iter().zip(&slots) {
        let mut original = vec![None; times.len()];
        let mut normalized = vec![None; times.len()];
        let mut offset = vec![None; times.len()];

        for (p, &(key, occurrence)) in s.points.iter().zip(assigned) {
            let row = first_row[key] + occurrence;
            original[row] = Some(p.intensity);
            normalized[row] = Some(p.normalized);
            offset[row] = Some(p.offset);
        }

        for (kind, values) in ColumnKind::ALL.into_iter().zip([original, normalized, offset]) {
            columns.push(MergedColumn {
                label: s.label.clone(),
                kind,
                values,
            });
        }
    }

    Ok(MergedTable { times, columns })
}

/// Sorted, de-duplicated row keys for the union of all time values
fn row_keys(series: &[StackedSeries], policy: TimeMatch) -> Vec<f64> {
    let mut all: Vec<f64> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| canonical(p.time)))
        .collect();
    all.sort_by(f64::total_cmp);
    all.dedup();

    match policy {
        TimeMatch::Exact => all,
        TimeMatch::Tolerance(tolerance) => {
            let mut keys: Vec<f64> = Vec::new();
            for t in all {
                match keys.last() {
                    Some(&start) if t - start <= tolerance => {}
                    _ => keys.push(t),
                }
            }
            keys
        }
    }
}

/// Index of the last key not greater than `time`
fn row_of(keys: &[f64], time: f64) -> usize {
    keys.partition_point(|&k| k <= time).saturating_sub(1)
}

fn canonical(time: f64) -> f64 {
    if time == 0.0 {
        0.0
    } else {
        time
    }
}
