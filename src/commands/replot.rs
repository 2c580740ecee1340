//! Replot command implementation.
//!
//! Re-renders the chart from the offset columns of a previously exported
//! table. Values are drawn as stored; nothing is re-normalized.

use super::models::{ReplotArgs, ReplotReport};
use super::utils::{check_destinations, load_validated};
use crate::chart::{render_chart, PlotSeries};
use crate::config::Purpose;
use crate::output::{read_offset_table, write_svg, Confirmer, OffsetTable};
use crate::utils::config::{Y_AXIS_FLOOR, Y_AXIS_HEADROOM};
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the replot command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Configuration errors
/// * Input table missing or malformed
/// * No offset value falls inside `x_limits`
/// * Destination exists and may not be overwritten
pub fn execute_replot(args: &ReplotArgs, confirmer: &mut dyn Confirmer) -> Result<ReplotReport> {
    let start_time = Instant::now();

    info!("Step 1/4: Validating configuration {}...", args.config.display());
    let config = load_validated(&args.config, Purpose::Replot)?;

    let chart_path = config.output_paths().chart;
    let policy = args
        .on_existing
        .unwrap_or(config.general.on_existing)
        .for_session(args.interactive);
    let modes = check_destinations(&[chart_path.as_path()], policy, confirmer)?;

    info!("Step 2/4: Reading merged table {}...", args.input.display());
    let table = read_offset_table(&args.input)
        .with_context(|| format!("Failed to read merged table {}", args.input.display()))?;

    info!("Step 3/4: Rendering {} series...", table.columns.len());
    let [x_min, x_max] = config.general.x_limits;
    let y_max = max_offset_within(&table, (x_min, x_max)).with_context(|| {
        format!(
            "No offset values in {} with time inside x_limits [{}, {}]",
            args.input.display(),
            x_min,
            x_max
        )
    })?;
    let y_limits = (Y_AXIS_FLOOR, y_max + Y_AXIS_HEADROOM);
    debug!("Derived y limits: [{}, {}]", y_limits.0, y_limits.1);

    let series: Vec<PlotSeries> = table
        .columns
        .iter()
        .map(|column| PlotSeries::new(column.label.clone(), table.points(column)))
        .collect();

    let svg = render_chart(&series, &config.chart_layout(y_limits), &config.style)
        .context("Failed to render chart")?;

    info!("Step 4/4: Writing chart...");
    write_svg(&svg, &chart_path, modes[0]).context("Failed to write chart SVG")?;
    info!("✓ Chart written to: {}", chart_path.display());

    info!("Replot completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(ReplotReport {
        chart_path,
        labels: table.columns.iter().map(|c| c.label.clone()).collect(),
        y_limits,
    })
}

/// Largest offset value whose time lies inside `x_limits` (inclusive)
pub fn max_offset_within(table: &OffsetTable, x_limits: (f64, f64)) -> Option<f64> {
    let (x_min, x_max) = x_limits;

    table
        .columns
        .iter()
        .flat_map(|column| table.times.iter().zip(&column.values))
        .filter(|(time, _)| (x_min..=x_max).contains(*time))
        .filter_map(|(_, value)| *value)
        .reduce(f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OffsetColumn;

    fn table() -> OffsetTable {
        OffsetTable {
            times: vec![8.0, 10.0, 12.0, 20.0],
            columns: vec![
                OffsetColumn {
                    label: "a".to_string(),
                    values: vec![Some(500.0), Some(110.0), None, Some(900.0)],
                },
                OffsetColumn {
                    label: "b".to_string(),
                    values: vec![None, Some(5.0), Some(100.0), None],
                },
            ],
        }
    }

    #[test]
    fn test_max_offset_ignores_times_outside_limits() {
        assert_eq!(max_offset_within(&table(), (9.0, 16.0)), Some(110.0));
    }

    #[test]
    fn test_max_offset_limits_are_inclusive() {
        assert_eq!(max_offset_within(&table(), (12.0, 20.0)), Some(900.0));
    }

    #[test]
    fn test_max_offset_none_when_nothing_in_range() {
        assert_eq!(max_offset_within(&table(), (30.0, 40.0)), None);
    }
}
