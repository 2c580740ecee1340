//! Run configuration schema.
//!
//! Mirrors the TOML layout:
//!
//! ```toml
//! [general]
//! destination_folder = "out"
//! filename = "hplc_overlay"
//! time_range = [10.0, 14.0]
//! x_limits = [9.0, 16.0]
//! major_tick_interval = 5.0
//! num_minor_ticks = 4
//!
//! [[series]]
//! path = "data/run-05.csv"
//!
//! [style]
//! figure_size = [8.0, 8.0]
//! # ...
//! ```

use crate::aggregator::{DisplayOrder, TimeMatch};
use crate::chart::{ChartLayout, ChartStyle};
use crate::output::OverwritePolicy;
use crate::parser::{derive_label, TimeWindow, TraceColumns};
use crate::utils::config::{DEFAULT_INTENSITY_COLUMN, DEFAULT_OFFSET_STEP, DEFAULT_TIME_COLUMN};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Complete run configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub general: GeneralConfig,

    #[serde(default)]
    pub series: Vec<SeriesConfig>,

    pub style: ChartStyle,

    /// Directory relative paths resolve against (the config file's directory)
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// `[general]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    pub destination_folder: PathBuf,

    /// Output base name without extension
    pub filename: String,

    /// Default reference window `[start, end]`
    pub time_range: [f64; 2],

    pub x_limits: [f64; 2],
    pub major_tick_interval: f64,
    pub num_minor_ticks: u32,

    #[serde(default = "default_offset_step")]
    pub offset_step: f64,

    #[serde(default)]
    pub display_order: DisplayOrderSetting,

    #[serde(default = "default_time_column")]
    pub time_column: String,

    #[serde(default = "default_intensity_column")]
    pub intensity_column: String,

    /// 0 means exact time matching in the merge
    #[serde(default)]
    pub time_tolerance: f64,

    #[serde(default)]
    pub on_existing: OverwritePolicy,
}

fn default_offset_step() -> f64 {
    DEFAULT_OFFSET_STEP
}

fn default_time_column() -> String {
    DEFAULT_TIME_COLUMN.to_string()
}

fn default_intensity_column() -> String {
    DEFAULT_INTENSITY_COLUMN.to_string()
}

/// `display_order = "load" | "reverse" | ["label", ...]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DisplayOrderSetting {
    Policy(OrderPolicy),
    Labels(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderPolicy {
    Load,
    Reverse,
}

impl Default for DisplayOrderSetting {
    fn default() -> Self {
        DisplayOrderSetting::Policy(OrderPolicy::Reverse)
    }
}

impl From<&DisplayOrderSetting> for DisplayOrder {
    fn from(setting: &DisplayOrderSetting) -> Self {
        match setting {
            DisplayOrderSetting::Policy(OrderPolicy::Load) => DisplayOrder::LoadOrder,
            DisplayOrderSetting::Policy(OrderPolicy::Reverse) => DisplayOrder::ReverseLoadOrder,
            DisplayOrderSetting::Labels(labels) => DisplayOrder::Explicit(labels.clone()),
        }
    }
}

/// One `[[series]]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesConfig {
    pub path: PathBuf,

    #[serde(default)]
    pub label: Option<String>,

    /// Overrides `general.time_range` for this series
    #[serde(default)]
    pub time_range: Option<[f64; 2]>,
}

/// Files written by one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub table: PathBuf,
    pub chart: PathBuf,
}

impl RunConfig {
    /// Resolve a configured path against the config file's directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn series_path(&self, series: &SeriesConfig) -> PathBuf {
        self.resolve(&series.path)
    }

    /// Explicit label, else the file name
    pub fn series_label(&self, series: &SeriesConfig) -> String {
        series
            .label
            .clone()
            .unwrap_or_else(|| derive_label(&series.path))
    }

    /// Labels of all series in load order
    pub fn labels(&self) -> Vec<String> {
        self.series.iter().map(|s| self.series_label(s)).collect()
    }

    pub fn window_for(&self, series: &SeriesConfig) -> TimeWindow {
        TimeWindow::from(series.time_range.unwrap_or(self.general.time_range))
    }

    pub fn display_order(&self) -> DisplayOrder {
        DisplayOrder::from(&self.general.display_order)
    }

    pub fn time_match(&self) -> TimeMatch {
        TimeMatch::from_tolerance(self.general.time_tolerance)
    }

    pub fn trace_columns(&self) -> TraceColumns {
        TraceColumns {
            time: self.general.time_column.clone(),
            intensity: self.general.intensity_column.clone(),
        }
    }

    pub fn output_paths(&self) -> OutputPaths {
        let folder = self.resolve(&self.general.destination_folder);
        OutputPaths {
            table: folder.join(format!("{}.csv", self.general.filename)),
            chart: folder.join(format!("{}.svg", self.general.filename)),
        }
    }

    /// Chart layout with the configured x range and the given y range
    pub fn chart_layout(&self, y_limits: (f64, f64)) -> ChartLayout {
        let [x_min, x_max] = self.general.x_limits;
        ChartLayout {
            x_limits: (x_min, x_max),
            y_limits,
            major_tick_interval: self.general.major_tick_interval,
            num_minor_ticks: self.general.num_minor_ticks,
        }
    }
}
