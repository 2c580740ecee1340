//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod models;
pub mod plot;
pub mod replot;
pub mod utils;

// Re-export main command functions
pub use models::{PlotArgs, PlotReport, ReplotArgs, ReplotReport, SeriesSummary};
pub use plot::{build_table, execute_plot, render_summary};
pub use replot::{execute_replot, max_offset_within};
pub use utils::{
    check_destinations, display_version, is_cancelled, load_validated, validate_config_file,
};
