//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const SERIES_A: &str = "min,Intensity\n10,0\n11,50\n12,100\n13,0\n";
pub const SERIES_B: &str = "min,Intensity\n10.5,0\n11.5,25\n12.5,100\n13.5,0\n";

pub const STYLE: &str = r#"
[style]
figure_size = [7.62, 7.62]
font = "Arial"
font_size = 9.0
font_weight = "bold"
axis_width = 1.5
line_width = 1.0
major_tick_length = 4.0
major_tick_width = 1.5
minor_tick_length = 2.0
minor_tick_width = 1.0
tick_font = "Arial"
tick_font_size = 9.0
tick_font_weight = "bold"
adjust_left = 0.12
adjust_right = 0.88
adjust_top = 0.9
adjust_bottom = 0.14
"#;

/// `[general]` table writing to `out/overlay.{csv,svg}`
pub fn general(extra: &str) -> String {
    format!(
        r#"
[general]
destination_folder = "out"
filename = "overlay"
time_range = [10.0, 13.0]
x_limits = [9.0, 16.0]
major_tick_interval = 5.0
num_minor_ticks = 4
{}
"#,
        extra
    )
}

/// Write `contents` as the run configuration inside `dir`
pub fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("chromastack.toml");
    fs::write(&path, contents).unwrap();
    path
}

/// Two-series fixture: `a.csv` and `b.csv` with per-series windows
pub fn two_series_fixture(dir: &Path, general_extra: &str) -> PathBuf {
    fs::write(dir.join("a.csv"), SERIES_A).unwrap();
    fs::write(dir.join("b.csv"), SERIES_B).unwrap();

    let config = format!(
        r#"{}
[[series]]
path = "a.csv"
time_range = [10.0, 13.0]

[[series]]
path = "b.csv"
time_range = [10.5, 13.5]
{}"#,
        general(general_extra),
        STYLE
    );
    write_config(dir, &config)
}
