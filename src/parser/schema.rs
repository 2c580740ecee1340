//! In-memory data model for detector traces.
//!
//! Each pipeline stage produces a new derived series type; nothing here is
//! mutated after construction.

use std::path::PathBuf;

/// A single (time, intensity) sample as read from the detector export
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub time: f64,
    pub intensity: f64,
}

impl SeriesPoint {
    pub fn new(time: f64, intensity: f64) -> Self {
        Self { time, intensity }
    }
}

/// A raw trace, in source row order
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Display label (explicit or derived from the file name)
    pub label: String,

    /// File the series was read from, if any
    pub source: Option<PathBuf>,

    pub points: Vec<SeriesPoint>,
}

impl Series {
    /// Build a series from `(time, intensity)` pairs
    pub fn from_pairs(label: impl Into<String>, pairs: &[(f64, f64)]) -> Self {
        Self {
            label: label.into(),
            source: None,
            points: pairs.iter().map(|&(t, i)| SeriesPoint::new(t, i)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Closed interval `[start, end]` on the time axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Inclusive at both ends
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }

    pub fn is_valid(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start <= self.end
    }
}

impl From<[f64; 2]> for TimeWindow {
    fn from(bounds: [f64; 2]) -> Self {
        Self::new(bounds[0], bounds[1])
    }
}

/// Header names of the time and intensity columns in a raw trace file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceColumns {
    pub time: String,
    pub intensity: String,
}

impl Default for TraceColumns {
    fn default() -> Self {
        Self {
            time: crate::utils::config::DEFAULT_TIME_COLUMN.to_string(),
            intensity: crate::utils::config::DEFAULT_INTENSITY_COLUMN.to_string(),
        }
    }
}
