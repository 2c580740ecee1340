use crate::output::OverwritePolicy;
use crate::utils::config::DEFAULT_CONFIG_FILE;
use std::path::PathBuf;

/// Arguments for the plot command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct PlotArgs {
    /// Run configuration file
    pub config: PathBuf,

    /// Overrides `general.on_existing`
    pub on_existing: Option<OverwritePolicy>,

    /// Overrides `general.offset_step`
    pub offset_step: Option<f64>,

    /// Print per-series summary to stdout
    pub print_summary: bool,

    /// Whether a user can answer overwrite prompts
    pub interactive: bool,
}

impl Default for PlotArgs {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG_FILE),
            on_existing: None,
            offset_step: None,
            print_summary: false,
            interactive: false,
        }
    }
}

/// Arguments for the replot command
#[derive(Debug, Clone)]
pub struct ReplotArgs {
    pub config: PathBuf,

    /// Previously exported merged table
    pub input: PathBuf,

    pub on_existing: Option<OverwritePolicy>,
    pub interactive: bool,
}

impl Default for ReplotArgs {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG_FILE),
            input: PathBuf::new(),
            on_existing: None,
            interactive: false,
        }
    }
}

/// Per-series outcome of a plot run
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub label: String,
    pub ordinal: usize,
    pub peak: f64,
    pub baseline: f64,
    pub offset: f64,
    pub points: usize,
}

/// What a plot run produced
#[derive(Debug, Clone, PartialEq)]
pub struct PlotReport {
    pub table_path: PathBuf,
    pub chart_path: PathBuf,

    /// Series in display order
    pub series: Vec<SeriesSummary>,

    /// Rows of the merged table
    pub rows: usize,
}

/// What a replot run produced
#[derive(Debug, Clone, PartialEq)]
pub struct ReplotReport {
    pub chart_path: PathBuf,
    pub labels: Vec<String>,
    pub y_limits: (f64, f64),
}
