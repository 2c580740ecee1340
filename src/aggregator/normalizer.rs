//! Percent-of-peak normalization against a reference window.
//!
//! The window only selects the reference values: peak is the maximum and
//! baseline the minimum intensity inside it. Every point of the series is
//! then rescaled with `(intensity - baseline) / (peak - baseline) * 100`.

use crate::parser::{Series, TimeWindow};
use crate::utils::error::NormalizeError;
use log::debug;

/// One sample with its normalized value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedPoint {
    pub time: f64,
    pub intensity: f64,
    pub normalized: f64,
}

/// A series rescaled to a 0-100 percent-of-peak basis
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    pub label: String,

    /// Reference window the peak and baseline were taken from
    pub window: TimeWindow,

    pub peak: f64,
    pub baseline: f64,

    pub points: Vec<NormalizedPoint>,
}

/// Find the peak (max) and baseline (min) intensity inside `window`
///
/// # Errors
/// * `NormalizeError::EmptyWindow` - No point has its time inside the window
pub fn find_peak_and_baseline(
    series: &Series,
    window: &TimeWindow,
) -> Result<(f64, f64), NormalizeError> {
    let mut in_window = series
        .points
        .iter()
        .filter(|p| window.contains(p.time))
        .map(|p| p.intensity);

    let first = in_window.next().ok_or_else(|| NormalizeError::EmptyWindow {
        label: series.label.clone(),
        start: window.start,
        end: window.end,
    })?;

    Ok(in_window.fold((first, first), |(peak, baseline), v| {
        (peak.max(v), baseline.min(v))
    }))
}

/// Normalize a series against its reference window
///
/// **Public** - main entry point for normalization
///
/// # Errors
/// * `NormalizeError::EmptyWindow` - Nothing to take a reference from
/// * `NormalizeError::DegenerateRange` - Peak equals baseline inside the window
pub fn normalize(series: &Series, window: &TimeWindow) -> Result<NormalizedSeries, NormalizeError> {
    let (peak, baseline) = find_peak_and_baseline(series, window)?;

    if peak == baseline {
        return Err(NormalizeError::DegenerateRange {
            label: series.label.clone(),
            value: peak,
            start: window.start,
            end: window.end,
        });
    }

    debug!(
        "Series '{}': peak {} / baseline {} in [{}, {}]",
        series.label, peak, baseline, window.start, window.end
    );

    let range = peak - baseline;
    let points = series
        .points
        .iter()
        .map(|p| NormalizedPoint {
            time: p.time,
            intensity: p.intensity,
            normalized: (p.intensity - baseline) / range * 100.0,
        })
        .collect();

    Ok(NormalizedSeries {
        label: series.label.clone(),
        window: *window,
        peak,
        baseline,
        points,
    })
}
