//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or validating the run configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read configuration file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed configuration: {0}")]
    Malformed(#[from] toml::de::Error),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Missing required configuration value: {0}")]
    Missing(String),
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while loading a raw trace
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Trace file not found: {0}")]
    NotFound(PathBuf),

    #[error("Cannot read trace file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Trace file {path} has no '{column}' column")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Trace file {path}, row {row}, column '{column}': '{value}' is not a finite number")]
    InvalidValue {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },
}

/// Errors that can occur while normalizing a series against its window
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Series '{label}' has no points inside the reference window [{start}, {end}]")]
    EmptyWindow { label: String, start: f64, end: f64 },

    #[error(
        "Series '{label}' has constant intensity {value} inside the reference window [{start}, {end}]; peak equals baseline"
    )]
    DegenerateRange {
        label: String,
        value: f64,
        start: f64,
        end: f64,
    },
}

/// Errors that can occur while merging series into one table
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Two input series share the label '{0}'")]
    LabelCollision(String),

    #[error("No series to merge")]
    NoSeries,
}

/// Errors that can occur during chart generation
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("No series to plot")]
    NoSeries,

    #[error("Invalid axis range for {axis}: [{min}, {max}]")]
    InvalidRange { axis: &'static str, min: f64, max: f64 },

    #[error("Axis would need {count} ticks, more than the limit of {limit}")]
    TooManyTicks { count: f64, limit: usize },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Output file already exists: {0}")]
    DestinationExists(PathBuf),

    #[error("Overwrite of {0} declined")]
    Cancelled(PathBuf),

    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Delimited table error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Malformed table {path}: {reason}")]
    MalformedTable { path: PathBuf, reason: String },
}
