//! Constants shared across the pipeline.

/// Default vertical distance between stacked traces (percent-of-peak units)
pub const DEFAULT_OFFSET_STEP: f64 = 110.0;

/// Lower y limit used by both chart layouts
pub const Y_AXIS_FLOOR: f64 = -10.0;

/// Headroom above the highest trace when the y range is derived from data
pub const Y_AXIS_HEADROOM: f64 = 10.0;

/// Most x ticks (major plus minor) a chart may carry
pub const MAX_TICKS: usize = 1000;

/// Default configuration file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "chromastack.toml";

// Column names of the raw detector export
pub const DEFAULT_TIME_COLUMN: &str = "min";
pub const DEFAULT_INTENSITY_COLUMN: &str = "Intensity";

// Column names of the merged table
pub const TIME_HEADER: &str = "Time (min)";
pub const ORIGINAL_PREFIX: &str = "Original Intensity";
pub const NORMALIZED_PREFIX: &str = "Normalized Intensity";
pub const OFFSET_PREFIX: &str = "Normalized Intensity (Offset)";

/// Axis title drawn on the y axis when it is visible
pub const Y_AXIS_TITLE: &str = "Normalized Intensity (Offset)";

pub const CM_PER_INCH: f64 = 2.54;
pub const POINTS_PER_INCH: f64 = 72.0;
