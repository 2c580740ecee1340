//! Trace loading and data model.
//!
//! This module handles:
//! - Reading raw detector exports
//! - Deriving series labels
//! - Defining the series and window types shared by the pipeline

pub mod schema;
pub mod trace_csv;

// Re-export main types
pub use schema::{Series, SeriesPoint, TimeWindow, TraceColumns};
pub use trace_csv::{derive_label, load_series};
