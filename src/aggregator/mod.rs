//! Normalization, stacking and merging of loaded traces.
//!
//! This module transforms loaded series into:
//! - Percent-of-peak normalized series (per reference window)
//! - Offset-stacked series (per display ordinal)
//! - One merged wide table (outer join on time)

pub mod merger;
pub mod normalizer;
pub mod stacker;

// Re-export main types and functions
pub use merger::{ensure_unique_labels, merge, ColumnKind, MergedColumn, MergedTable, TimeMatch};
pub use normalizer::{find_peak_and_baseline, normalize, NormalizedPoint, NormalizedSeries};
pub use stacker::{stack, stack_in_order, DisplayOrder, StackedPoint, StackedSeries};
