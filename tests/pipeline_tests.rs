mod common;

use chromastack::aggregator::{
    merge, normalize, stack, stack_in_order, ColumnKind, DisplayOrder, TimeMatch,
};
use chromastack::commands::{execute_plot, PlotArgs};
use chromastack::output::Confirmer;
use chromastack::parser::{Series, TimeWindow};
use chromastack::utils::{MergeError, NormalizeError};
use pretty_assertions::assert_eq;
use std::fs;
use std::io;
use std::path::Path;

struct Refuse;

impl Confirmer for Refuse {
    fn confirm_overwrite(&mut self, _path: &Path) -> io::Result<bool> {
        Ok(false)
    }
}

fn series_a() -> Series {
    Series::from_pairs("A", &[(10.0, 0.0), (11.0, 50.0), (12.0, 100.0), (13.0, 0.0)])
}

fn series_b() -> Series {
    Series::from_pairs("B", &[(10.5, 0.0), (11.5, 25.0), (12.5, 100.0), (13.5, 0.0)])
}

#[test]
fn test_two_series_example() {
    let a = normalize(&series_a(), &TimeWindow::new(10.0, 13.0)).unwrap();
    let b = normalize(&series_b(), &TimeWindow::new(10.5, 13.5)).unwrap();
    assert_eq!((a.peak, a.baseline), (100.0, 0.0));
    assert_eq!((b.peak, b.baseline), (100.0, 0.0));

    // Load order [A, B], reversed for display: B = 0, A = 1
    let stacked = stack_in_order(vec![a, b], &DisplayOrder::ReverseLoadOrder, 110.0).unwrap();
    assert_eq!(stacked[0].label, "B");
    assert_eq!(stacked[1].label, "A");

    let table = merge(&stacked, TimeMatch::Exact).unwrap();

    assert_eq!(
        table.times,
        vec![10.0, 10.5, 11.0, 11.5, 12.0, 12.5, 13.0, 13.5]
    );
    assert_eq!(table.column_count(), 7);

    assert_eq!(table.value("A", ColumnKind::Normalized, 12.0), Some(100.0));
    assert_eq!(table.value("A", ColumnKind::Offset, 12.0), Some(210.0));
    assert_eq!(table.value("B", ColumnKind::Original, 12.0), None);
    assert_eq!(table.value("B", ColumnKind::Offset, 12.0), None);
    assert_eq!(table.value("B", ColumnKind::Normalized, 12.5), Some(100.0));
    assert_eq!(table.value("B", ColumnKind::Offset, 12.5), Some(100.0));
}

#[test]
fn test_merge_keeps_every_time_value() {
    let a = stack(&normalize(&series_a(), &TimeWindow::new(10.0, 13.0)).unwrap(), 0, 110.0);
    let b = stack(&normalize(&series_b(), &TimeWindow::new(10.5, 13.5)).unwrap(), 1, 110.0);

    let table = merge(&[a.clone(), b.clone()], TimeMatch::Exact).unwrap();

    let mut expected: Vec<f64> = a
        .points
        .iter()
        .chain(&b.points)
        .map(|p| p.time)
        .collect();
    expected.sort_by(f64::total_cmp);
    expected.dedup();

    assert_eq!(table.times, expected);
    assert!(table.len() >= a.points.len().max(b.points.len()));
}

#[test]
fn test_non_strictly_increasing_series_keeps_every_sample() {
    let a = Series::from_pairs("A", &[(10.0, 0.0), (11.0, 40.0), (11.0, 60.0), (12.0, 100.0)]);
    let stacked = stack(&normalize(&a, &TimeWindow::new(10.0, 12.0)).unwrap(), 0, 110.0);

    let table = merge(&[stacked], TimeMatch::Exact).unwrap();

    assert_eq!(table.len(), 4);
    assert_eq!(table.times, vec![10.0, 11.0, 11.0, 12.0]);
    assert_eq!(
        table.column("A", ColumnKind::Normalized).unwrap().values,
        vec![Some(0.0), Some(40.0), Some(60.0), Some(100.0)]
    );
}

#[test]
fn test_window_isolation() {
    let window = TimeWindow::new(10.0, 13.0);
    let base = series_a();
    let mut changed = series_a();
    changed.points.push(chromastack::parser::SeriesPoint::new(20.0, 5000.0));

    let n1 = normalize(&base, &window).unwrap();
    let n2 = normalize(&changed, &window).unwrap();

    assert_eq!((n1.peak, n1.baseline), (n2.peak, n2.baseline));
    assert_eq!(n2.points.last().unwrap().normalized, 5000.0);
}

#[test]
fn test_degenerate_window_is_rejected() {
    let flat = Series::from_pairs("flat", &[(1.0, 7.0), (2.0, 7.0), (3.0, 9.0)]);
    let result = normalize(&flat, &TimeWindow::new(1.0, 2.0));
    assert!(matches!(result, Err(NormalizeError::DegenerateRange { .. })));
}

#[test]
fn test_label_collision_is_rejected() {
    let a = stack(&normalize(&series_a(), &TimeWindow::new(10.0, 13.0)).unwrap(), 0, 110.0);
    let result = merge(&[a.clone(), a], TimeMatch::Exact);
    assert!(matches!(result, Err(MergeError::LabelCollision(label)) if label == "A"));
}

#[test]
fn test_tolerance_joins_nearby_times() {
    let a = Series::from_pairs("A", &[(11.0, 0.0), (12.0, 100.0)]);
    let b = Series::from_pairs("B", &[(11.0000001, 0.0), (12.0, 50.0)]);
    let stacked = stack_in_order(
        vec![
            normalize(&a, &TimeWindow::new(11.0, 12.0)).unwrap(),
            normalize(&b, &TimeWindow::new(11.0, 12.0)).unwrap(),
        ],
        &DisplayOrder::LoadOrder,
        110.0,
    )
    .unwrap();

    assert_eq!(merge(&stacked, TimeMatch::Exact).unwrap().len(), 3);
    assert_eq!(merge(&stacked, TimeMatch::Tolerance(1e-3)).unwrap().len(), 2);
}

#[test]
fn test_plot_writes_expected_table() {
    let dir = tempfile::tempdir().unwrap();
    let args = PlotArgs {
        config: common::two_series_fixture(dir.path(), ""),
        ..Default::default()
    };

    let report = execute_plot(&args, &mut Refuse).unwrap();

    let written = fs::read_to_string(&report.table_path).unwrap();
    let expected = "\
Time (min),Original Intensity (b.csv),Normalized Intensity (b.csv),Normalized Intensity (Offset) (b.csv),Original Intensity (a.csv),Normalized Intensity (a.csv),Normalized Intensity (Offset) (a.csv)
10,,,,0,0,110
10.5,0,0,0,,,
11,,,,50,50,160
11.5,25,25,25,,,
12,,,,100,100,210
12.5,100,100,100,,,
13,,,,0,0,110
13.5,0,0,0,,,
";
    assert_eq!(written, expected);

    let svg = fs::read_to_string(&report.chart_path).unwrap();
    assert!(svg.starts_with("<?xml") || svg.starts_with("<svg"));
}

#[test]
fn test_plot_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::two_series_fixture(dir.path(), r#"on_existing = "overwrite""#);
    let args = PlotArgs {
        config,
        ..Default::default()
    };

    let first = execute_plot(&args, &mut Refuse).unwrap();
    let table1 = fs::read(&first.table_path).unwrap();
    let chart1 = fs::read(&first.chart_path).unwrap();

    let second = execute_plot(&args, &mut Refuse).unwrap();
    assert_eq!(fs::read(&second.table_path).unwrap(), table1);
    assert_eq!(fs::read(&second.chart_path).unwrap(), chart1);
}

#[test]
fn test_degenerate_series_produces_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::two_series_fixture(dir.path(), "");
    fs::write(dir.path().join("b.csv"), "min,Intensity\n10.5,3\n11.5,3\n12.5,3\n13.5,3\n").unwrap();

    let args = PlotArgs {
        config,
        ..Default::default()
    };
    let err = execute_plot(&args, &mut Refuse).unwrap_err();

    assert!(format!("{:#}", err).contains("b.csv"));
    assert!(!dir.path().join("out").join("overlay.csv").exists());
    assert!(!dir.path().join("out").join("overlay.svg").exists());
}

#[test]
fn test_explicit_display_order() {
    let dir = tempfile::tempdir().unwrap();
    let args = PlotArgs {
        config: common::two_series_fixture(dir.path(), r#"display_order = ["a.csv", "b.csv"]"#),
        ..Default::default()
    };

    let report = execute_plot(&args, &mut Refuse).unwrap();

    assert_eq!(report.series[0].label, "a.csv");
    assert_eq!(report.series[0].offset, 0.0);
    assert_eq!(report.series[1].label, "b.csv");
    assert_eq!(report.series[1].offset, 110.0);
}
