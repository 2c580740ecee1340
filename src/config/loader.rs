//! Configuration loading and eager validation.
//!
//! Everything that can be checked without touching input data is checked
//! here, before any trace is read.

use super::schema::{DisplayOrderSetting, RunConfig};
use crate::aggregator::stacker::check_permutation;
use crate::parser::TimeWindow;
use crate::utils::config::MAX_TICKS;
use crate::utils::error::ConfigError;
use log::debug;
use std::fs;
use std::path::Path;

/// What the configuration will be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    /// Full pipeline: needs at least one series
    Plot,

    /// Re-rendering an exported table: series list is not used
    Replot,
}

/// Read and parse a TOML configuration file
///
/// Relative paths inside the file resolve against its directory.
///
/// # Errors
/// * `ConfigError::Unreadable` - File cannot be read
/// * `ConfigError::Malformed` - TOML syntax error, unknown key, or missing required key
pub fn load_config(path: impl AsRef<Path>) -> Result<RunConfig, ConfigError> {
    let path = path.as_ref();

    debug!("Reading configuration from: {}", path.display());

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let base_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    parse_config(&contents, base_dir)
}

/// Parse configuration text
pub fn parse_config(contents: &str, base_dir: &Path) -> Result<RunConfig, ConfigError> {
    let mut config: RunConfig = toml::from_str(contents)?;
    config.base_dir = base_dir.to_path_buf();
    Ok(config)
}

/// Validate every value the pipeline will rely on
///
/// Label uniqueness is not checked here; see
/// [`crate::aggregator::ensure_unique_labels`].
///
/// # Errors
/// * `ConfigError::Missing` - No series configured for `Purpose::Plot`
/// * `ConfigError::InvalidValue` - Names the offending key
pub fn validate_config(config: &RunConfig, purpose: Purpose) -> Result<(), ConfigError> {
    let general = &config.general;

    if general.filename.trim().is_empty() {
        return Err(ConfigError::invalid("general.filename", "must not be empty"));
    }
    if general.filename.contains(|c: char| c == '/' || c == '\\') {
        return Err(ConfigError::invalid(
            "general.filename",
            "must be a base name without directories",
        ));
    }
    if general.destination_folder.as_os_str().is_empty() {
        return Err(ConfigError::invalid(
            "general.destination_folder",
            "must not be empty",
        ));
    }

    check_window("general.time_range", general.time_range)?;

    let [x_min, x_max] = general.x_limits;
    if !(x_min.is_finite() && x_max.is_finite() && x_min < x_max) {
        return Err(ConfigError::invalid(
            "general.x_limits",
            format!("[{}, {}] is not an increasing finite range", x_min, x_max),
        ));
    }

    if !(general.major_tick_interval.is_finite() && general.major_tick_interval > 0.0) {
        return Err(ConfigError::invalid(
            "general.major_tick_interval",
            "must be a positive number",
        ));
    }
    if general.num_minor_ticks == 0 {
        return Err(ConfigError::invalid(
            "general.num_minor_ticks",
            "must be at least 1",
        ));
    }
    let tick_count =
        (x_max - x_min) / general.major_tick_interval * general.num_minor_ticks as f64;
    if tick_count > MAX_TICKS as f64 {
        return Err(ConfigError::invalid(
            "general.major_tick_interval",
            format!(
                "x_limits [{}, {}] would need {:.0} ticks, more than {}",
                x_min, x_max, tick_count, MAX_TICKS
            ),
        ));
    }
    if !general.offset_step.is_finite() {
        return Err(ConfigError::invalid(
            "general.offset_step",
            "must be a finite number",
        ));
    }
    if !(general.time_tolerance.is_finite() && general.time_tolerance >= 0.0) {
        return Err(ConfigError::invalid(
            "general.time_tolerance",
            "must be zero or a positive number",
        ));
    }
    if general.time_column.trim().is_empty() {
        return Err(ConfigError::invalid("general.time_column", "must not be empty"));
    }
    if general.intensity_column.trim().is_empty() {
        return Err(ConfigError::invalid(
            "general.intensity_column",
            "must not be empty",
        ));
    }

    config.style.validate()?;

    if purpose == Purpose::Plot {
        validate_series(config)?;
    }

    Ok(())
}

fn validate_series(config: &RunConfig) -> Result<(), ConfigError> {
    if config.series.is_empty() {
        return Err(ConfigError::Missing("series (at least one [[series]] entry)".to_string()));
    }

    for (idx, series) in config.series.iter().enumerate() {
        if series.path.as_os_str().is_empty() {
            return Err(ConfigError::invalid(
                format!("series[{}].path", idx),
                "must not be empty",
            ));
        }
        if series.label.as_deref().is_some_and(|l| l.trim().is_empty()) {
            return Err(ConfigError::invalid(
                format!("series[{}].label", idx),
                "must not be empty",
            ));
        }
        if let Some(range) = series.time_range {
            check_window(&format!("series[{}].time_range", idx), range)?;
        }
    }

    Ok(())
}

/// Check an explicit display order against the configured labels
pub fn validate_display_order(config: &RunConfig) -> Result<(), ConfigError> {
    if let DisplayOrderSetting::Labels(order) = &config.general.display_order {
        let labels = config.labels();
        check_permutation(order, labels.iter().map(String::as_str))?;
    }
    Ok(())
}

fn check_window(key: &str, bounds: [f64; 2]) -> Result<(), ConfigError> {
    if TimeWindow::from(bounds).is_valid() {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            key,
            format!("[{}, {}] is not a finite window with start <= end", bounds[0], bounds[1]),
        ))
    }
}
