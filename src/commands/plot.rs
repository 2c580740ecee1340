//! Plot command implementation.
//!
//! The plot command:
//! 1. Loads and validates the configuration, checks destinations
//! 2. Loads every trace
//! 3. Normalizes each trace against its reference window
//! 4. Stacks the traces in display order
//! 5. Merges them into one table and renders the chart
//! 6. Writes output files

use super::models::{PlotArgs, PlotReport, SeriesSummary};
use super::utils::{check_destinations, load_validated};
use crate::aggregator::{merge, normalize, stack_in_order, MergedTable, NormalizedSeries, StackedSeries};
use crate::chart::{render_chart, PlotSeries};
use crate::config::{OutputPaths, Purpose, RunConfig};
use crate::output::{write_merged_table, write_svg, Confirmer, WriteMode};
use crate::parser::{load_series, Series};
use crate::utils::config::Y_AXIS_FLOOR;
use anyhow::{Context, Result};
use colored::*;
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the plot command
///
/// **Public** - main entry point called from main.rs
///
/// Nothing is written unless every step before writing succeeds.
///
/// # Errors
/// * Configuration, load, normalization, merge or chart errors
/// * Destination exists and may not be overwritten
/// * File write errors
pub fn execute_plot(args: &PlotArgs, confirmer: &mut dyn Confirmer) -> Result<PlotReport> {
    let start_time = Instant::now();

    // Step 1: Configuration and destinations
    info!("Step 1/6: Validating configuration {}...", args.config.display());
    let mut config = load_validated(&args.config, Purpose::Plot)?;
    if let Some(step) = args.offset_step {
        anyhow::ensure!(step.is_finite(), "--offset-step must be a finite number");
        config.general.offset_step = step;
    }

    let outputs = config.output_paths();
    let policy = args
        .on_existing
        .unwrap_or(config.general.on_existing)
        .for_session(args.interactive);
    let modes = check_destinations(
        &[outputs.table.as_path(), outputs.chart.as_path()],
        policy,
        confirmer,
    )?;

    // Step 2: Load traces
    info!("Step 2/6: Loading {} traces...", config.series.len());
    let loaded = load_all(&config)?;

    // Step 3: Normalize
    info!("Step 3/6: Normalizing against reference windows...");
    let normalized = normalize_all(&config, &loaded)?;

    // Step 4: Stack
    info!(
        "Step 4/6: Stacking in {:?} with offset step {}...",
        config.display_order(),
        config.general.offset_step
    );
    let stacked = stack_in_order(normalized, &config.display_order(), config.general.offset_step)
        .context("Failed to arrange series for display")?;

    for s in &stacked {
        debug!("  #{} {}: offset {}", s.ordinal, s.label, s.offset);
    }

    // Step 5: Merge and render
    info!("Step 5/6: Merging series and rendering chart...");
    let table = merge(&stacked, config.time_match()).context("Failed to merge series")?;
    debug!("Merged table: {} rows x {} columns", table.len(), table.column_count());

    let y_limits = (
        Y_AXIS_FLOOR,
        config.general.offset_step * stacked.len() as f64,
    );
    let svg = render_chart(&plot_series(&stacked), &config.chart_layout(y_limits), &config.style)
        .context("Failed to render chart")?;

    // Step 6: Write outputs
    info!("Step 6/6: Writing output files...");
    write_outputs(&table, &svg, &outputs, &modes)?;

    let report = PlotReport {
        table_path: outputs.table,
        chart_path: outputs.chart,
        series: stacked.iter().map(summarize).collect(),
        rows: table.len(),
    };

    if args.print_summary {
        println!("{}", render_summary(&report));
    }

    let elapsed = start_time.elapsed();
    info!("Plot completed in {:.2}s", elapsed.as_secs_f64());

    Ok(report)
}

/// Run load, normalize, stack and merge without writing anything
///
/// **Public** - library entry point for callers that want the table in memory
pub fn build_table(config: &RunConfig) -> Result<(Vec<StackedSeries>, MergedTable)> {
    let loaded = load_all(config)?;
    let normalized = normalize_all(config, &loaded)?;
    let stacked = stack_in_order(normalized, &config.display_order(), config.general.offset_step)
        .context("Failed to arrange series for display")?;
    let table = merge(&stacked, config.time_match()).context("Failed to merge series")?;
    Ok((stacked, table))
}

/// Write the table, then the chart; a failed chart write removes the table
fn write_outputs(
    table: &MergedTable,
    svg: &str,
    outputs: &OutputPaths,
    modes: &[WriteMode],
) -> Result<()> {
    write_merged_table(table, &outputs.table, modes[0])
        .context("Failed to write merged table")?;
    info!("✓ Table written to: {}", outputs.table.display());

    if let Err(e) = write_svg(svg, &outputs.chart, modes[1]) {
        if let Err(cleanup) = std::fs::remove_file(&outputs.table) {
            warn!("Could not remove {}: {}", outputs.table.display(), cleanup);
        }
        return Err(e).context("Failed to write chart SVG");
    }
    info!("✓ Chart written to: {}", outputs.chart.display());

    Ok(())
}

fn load_all(config: &RunConfig) -> Result<Vec<Series>> {
    let columns = config.trace_columns();

    config
        .series
        .iter()
        .map(|entry| {
            let path = config.series_path(entry);
            let label = config.series_label(entry);
            let series = load_series(&path, &columns, Some(&label))
                .with_context(|| format!("Failed to load series '{}'", label))?;
            debug!("Loaded '{}': {} points from {}", label, series.len(), path.display());
            Ok(series)
        })
        .collect()
}

/// Series come back in load order, each against its own window
fn normalize_all(config: &RunConfig, loaded: &[Series]) -> Result<Vec<NormalizedSeries>> {
    config
        .series
        .iter()
        .zip(loaded)
        .map(|(entry, series)| {
            let window = config.window_for(entry);
            let normalized = normalize(series, &window)
                .with_context(|| format!("Failed to normalize series '{}'", series.label))?;
            debug!(
                "Normalized '{}': peak {}, baseline {}",
                normalized.label, normalized.peak, normalized.baseline
            );
            Ok(normalized)
        })
        .collect()
}

fn plot_series(stacked: &[StackedSeries]) -> Vec<PlotSeries> {
    stacked
        .iter()
        .map(|s| {
            PlotSeries::new(
                s.label.clone(),
                s.points.iter().map(|p| (p.time, Some(p.offset))).collect(),
            )
        })
        .collect()
}

fn summarize(series: &StackedSeries) -> SeriesSummary {
    SeriesSummary {
        label: series.label.clone(),
        ordinal: series.ordinal,
        peak: series.peak,
        baseline: series.baseline,
        offset: series.offset,
        points: series.points.len(),
    }
}

/// Render a human-readable summary of a plot run for the terminal
pub fn render_summary(report: &PlotReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", "=".repeat(72)));
    out.push_str(&format!("{}\n", "PLOT SUMMARY".bold()));
    out.push_str(&format!("{}\n", "=".repeat(72)));
    out.push_str(&format!(
        "{:>3}  {:<28} {:>12} {:>12} {:>8} {:>7}\n",
        "#", "Series", "Peak", "Baseline", "Offset", "Points"
    ));

    // Top of the stack first, as it appears on the chart
    for s in report.series.iter().rev() {
        out.push_str(&format!(
            "{:>3}  {} {:>12} {:>12} {:>8} {:>7}\n",
            s.ordinal,
            format!("{:<28}", s.label).cyan(),
            s.peak,
            s.baseline,
            s.offset,
            s.points
        ));
    }

    out.push_str(&format!("\nMerged rows: {}\n", report.rows));
    out.push_str(&format!("Table: {}\n", report.table_path.display()));
    out.push_str(&format!("Chart: {}\n", report.chart_path.display()));
    out.push_str(&"=".repeat(72));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::output::OverwritePolicy;
    use std::fs;
    use std::path::Path;

    struct Refuse;

    impl Confirmer for Refuse {
        fn confirm_overwrite(&mut self, _path: &Path) -> std::io::Result<bool> {
            Ok(false)
        }
    }

    const STYLE: &str = r#"
[style]
figure_size = [8.0, 8.0]
font = "Arial"
font_size = 10.0
font_weight = "bold"
axis_width = 1.0
line_width = 1.0
major_tick_length = 4.0
major_tick_width = 1.0
minor_tick_length = 2.0
minor_tick_width = 0.5
tick_font = "Arial"
tick_font_size = 8.0
tick_font_weight = "normal"
adjust_left = 0.1
adjust_right = 0.95
adjust_top = 0.95
adjust_bottom = 0.1
"#;

    fn write_fixture(dir: &Path) -> std::path::PathBuf {
        fs::write(dir.join("a.csv"), "min,Intensity\n10,5\n11,105\n12,55\n").unwrap();
        fs::write(dir.join("b.csv"), "min,Intensity\n10,0\n11,50\n12,200\n").unwrap();

        let config = format!(
            r#"
[general]
destination_folder = "out"
filename = "overlay"
time_range = [10.0, 12.0]
x_limits = [9.0, 13.0]
major_tick_interval = 1.0
num_minor_ticks = 2

[[series]]
path = "a.csv"

[[series]]
path = "b.csv"
{}"#,
            STYLE
        );
        let path = dir.join("chromastack.toml");
        fs::write(&path, config).unwrap();
        path
    }

    #[test]
    fn test_build_table_reverse_order_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = write_fixture(dir.path());
        let contents = fs::read_to_string(&config_path).unwrap();
        let config = parse_config(&contents, dir.path()).unwrap();

        let (stacked, table) = build_table(&config).unwrap();

        assert_eq!(stacked[0].label, "b.csv");
        assert_eq!(stacked[1].label, "a.csv");
        assert_eq!(stacked[1].offset, 110.0);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_execute_plot_writes_both_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let args = PlotArgs {
            config: write_fixture(dir.path()),
            ..Default::default()
        };

        let report = execute_plot(&args, &mut Refuse).unwrap();

        assert!(report.table_path.exists());
        assert!(report.chart_path.exists());
        assert_eq!(report.rows, 3);
        assert_eq!(report.series.len(), 2);
    }

    #[test]
    fn test_execute_plot_rejects_existing_without_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let args = PlotArgs {
            config: write_fixture(dir.path()),
            ..Default::default()
        };
        execute_plot(&args, &mut Refuse).unwrap();

        // Non-interactive prompt degrades to reject
        assert!(execute_plot(&args, &mut Refuse).is_err());

        let args = PlotArgs {
            on_existing: Some(OverwritePolicy::Overwrite),
            ..args
        };
        assert!(execute_plot(&args, &mut Refuse).is_ok());
    }

    #[test]
    fn test_offset_step_override() {
        let dir = tempfile::tempdir().unwrap();
        let args = PlotArgs {
            config: write_fixture(dir.path()),
            offset_step: Some(50.0),
            ..Default::default()
        };

        let report = execute_plot(&args, &mut Refuse).unwrap();
        assert_eq!(report.series[1].offset, 50.0);
    }

    #[test]
    fn test_failed_chart_write_removes_table() {
        let dir = tempfile::tempdir().unwrap();
        let contents = fs::read_to_string(write_fixture(dir.path())).unwrap();
        let config = parse_config(&contents, dir.path()).unwrap();
        let (_, table) = build_table(&config).unwrap();

        // The chart appears after the destination check passed
        let outputs = config.output_paths();
        fs::create_dir_all(dir.path().join("out")).unwrap();
        fs::write(&outputs.chart, "keep").unwrap();

        let err = write_outputs(
            &table,
            "<svg/>",
            &outputs,
            &[WriteMode::CreateNew, WriteMode::CreateNew],
        )
        .unwrap_err();

        assert!(format!("{:#}", err).contains("chart"));
        assert!(!outputs.table.exists());
        assert_eq!(fs::read_to_string(&outputs.chart).unwrap(), "keep");
    }

    #[test]
    fn test_render_summary_lists_series() {
        let report = PlotReport {
            table_path: "out/x.csv".into(),
            chart_path: "out/x.svg".into(),
            series: vec![SeriesSummary {
                label: "run-05.csv".to_string(),
                ordinal: 0,
                peak: 105.0,
                baseline: 5.0,
                offset: 0.0,
                points: 3,
            }],
            rows: 3,
        };

        let text = render_summary(&report);
        assert!(text.contains("run-05.csv"));
        assert!(text.contains("Merged rows: 3"));
        assert!(text.contains("out/x.svg"));
    }
}
