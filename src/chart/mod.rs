//! Stacked chromatogram chart rendering.

pub mod generator;
pub mod style;

pub use generator::{format_tick, render_chart, x_ticks, ChartLayout, PlotSeries};
pub use style::{ChartStyle, SpineVisibility};
