//! SVG line chart generation for stacked traces.
//!
//! Hand-built SVG in the style of a publication figure:
//! - Single-colour traces clipped to the axes rectangle
//! - Outward major/minor x ticks with numeric labels
//! - Per-side spine visibility, optional y axis
//!
//! Values are only mapped to page coordinates, never recomputed.

use super::style::ChartStyle;
use crate::utils::config::{CM_PER_INCH, MAX_TICKS, POINTS_PER_INCH, TIME_HEADER, Y_AXIS_TITLE};
use crate::utils::error::ChartError;
use log::{debug, info};
use std::fmt::Write;

/// One trace as handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub label: String,

    /// Points in drawing order; `None` breaks the line
    pub points: Vec<(f64, Option<f64>)>,
}

impl PlotSeries {
    pub fn new(label: impl Into<String>, points: Vec<(f64, Option<f64>)>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }
}

/// Data ranges and tick spacing of the chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub x_limits: (f64, f64),
    pub y_limits: (f64, f64),
    pub major_tick_interval: f64,

    /// Subdivisions per major interval (n - 1 minor ticks between majors)
    pub num_minor_ticks: u32,
}

/// Axes rectangle in page points and the data-to-page mapping
struct Frame {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    x_limits: (f64, f64),
    y_limits: (f64, f64),
}

impl Frame {
    fn new(width: f64, height: f64, layout: &ChartLayout, style: &ChartStyle) -> Self {
        Self {
            left: style.adjust_left * width,
            right: style.adjust_right * width,
            top: (1.0 - style.adjust_top) * height,
            bottom: (1.0 - style.adjust_bottom) * height,
            x_limits: layout.x_limits,
            y_limits: layout.y_limits,
        }
    }

    fn x(&self, value: f64) -> f64 {
        let (min, max) = self.x_limits;
        self.left + (value - min) / (max - min) * (self.right - self.left)
    }

    fn y(&self, value: f64) -> f64 {
        let (min, max) = self.y_limits;
        self.bottom - (value - min) / (max - min) * (self.bottom - self.top)
    }
}

/// Render the stacked traces as an SVG document
///
/// **Public** - main entry point for chart rendering
///
/// # Errors
/// * `ChartError::NoSeries` - Nothing to draw
/// * `ChartError::InvalidRange` - Axis limits empty, inverted or non-finite
/// * `ChartError::TooManyTicks` - Tick spacing too fine for the x limits
pub fn render_chart(
    series: &[PlotSeries],
    layout: &ChartLayout,
    style: &ChartStyle,
) -> Result<String, ChartError> {
    if series.is_empty() {
        return Err(ChartError::NoSeries);
    }
    check_range("x", layout.x_limits)?;
    check_range("y", layout.y_limits)?;
    check_tick_count(layout)?;

    info!("Rendering chart with {} series", series.len());

    let [width_cm, height_cm] = style.figure_size;
    let width = width_cm / CM_PER_INCH * POINTS_PER_INCH;
    let height = height_cm / CM_PER_INCH * POINTS_PER_INCH;
    let frame = Frame::new(width, height, layout, style);

    let mut svg = String::new();

    // Header
    let _ = write!(
        svg,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}cm" height="{}cm" viewBox="0 0 {:.2} {:.2}" font-family="{}" font-size="{}" font-weight="{}">
"#,
        width_cm,
        height_cm,
        width,
        height,
        escape_xml(&style.font),
        style.font_size,
        escape_xml(&style.font_weight)
    );

    let _ = writeln!(
        svg,
        r#"<defs><clipPath id="plot-area"><rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"/></clipPath></defs>"#,
        frame.left,
        frame.top,
        frame.right - frame.left,
        frame.bottom - frame.top
    );

    render_traces(&mut svg, series, &frame, style);
    render_spines(&mut svg, &frame, style);
    render_x_axis(&mut svg, &frame, layout, style);
    if style.show_y_axis {
        render_y_axis(&mut svg, &frame, style);
    }

    svg.push_str("</svg>\n");

    info!("Chart generated successfully ({} bytes)", svg.len());
    Ok(svg)
}

fn check_range(axis: &'static str, (min, max): (f64, f64)) -> Result<(), ChartError> {
    if min.is_finite() && max.is_finite() && min < max {
        Ok(())
    } else {
        Err(ChartError::InvalidRange { axis, min, max })
    }
}

fn check_tick_count(layout: &ChartLayout) -> Result<(), ChartError> {
    let step = layout.major_tick_interval;
    if !(step.is_finite() && step > 0.0) {
        // x_ticks draws nothing for an unusable step
        return Ok(());
    }

    let (min, max) = layout.x_limits;
    let count = (max - min) / step * layout.num_minor_ticks.max(1) as f64;
    if count <= MAX_TICKS as f64 {
        Ok(())
    } else {
        Err(ChartError::TooManyTicks {
            count,
            limit: MAX_TICKS,
        })
    }
}

fn render_traces(out: &mut String, series: &[PlotSeries], frame: &Frame, style: &ChartStyle) {
    let _ = writeln!(
        out,
        r#"<g clip-path="url(#plot-area)" fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round">"#,
        escape_xml(&style.line_color),
        style.line_width
    );

    for s in series {
        let path = path_data(&s.points, frame);
        if path.is_empty() {
            debug!("Series '{}' has no drawable points", s.label);
            continue;
        }
        let _ = writeln!(
            out,
            r#"<path d="{}"><title>{}</title></path>"#,
            path,
            escape_xml(&s.label)
        );
    }

    out.push_str("</g>\n");
}

/// Polyline path; a `None` value starts a new subpath
fn path_data(points: &[(f64, Option<f64>)], frame: &Frame) -> String {
    let mut d = String::new();
    let mut pen_down = false;

    for &(time, value) in points {
        match value {
            Some(v) => {
                let cmd = if pen_down { 'L' } else { 'M' };
                if !d.is_empty() {
                    d.push(' ');
                }
                let _ = write!(d, "{}{:.2},{:.2}", cmd, frame.x(time), frame.y(v));
                pen_down = true;
            }
            None => pen_down = false,
        }
    }

    d
}

fn render_spines(out: &mut String, frame: &Frame, style: &ChartStyle) {
    let sides = [
        (style.spines.top, (frame.left, frame.top, frame.right, frame.top)),
        (style.spines.right, (frame.right, frame.top, frame.right, frame.bottom)),
        (style.spines.bottom, (frame.left, frame.bottom, frame.right, frame.bottom)),
        (style.spines.left, (frame.left, frame.top, frame.left, frame.bottom)),
    ];

    for (visible, (x1, y1, x2, y2)) in sides {
        if visible {
            let _ = writeln!(
                out,
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="black" stroke-width="{}" stroke-linecap="square"/>"#,
                x1, y1, x2, y2, style.axis_width
            );
        }
    }
}

fn render_x_axis(out: &mut String, frame: &Frame, layout: &ChartLayout, style: &ChartStyle) {
    let (majors, minors) = x_ticks(layout);

    for t in &minors {
        tick_line(out, frame.x(*t), frame.bottom, style.minor_tick_length, style.minor_tick_width);
    }
    for t in &majors {
        tick_line(out, frame.x(*t), frame.bottom, style.major_tick_length, style.major_tick_width);
    }

    // Label baseline sits one tick-font height below the tick ends
    let label_y = frame.bottom + style.major_tick_length + 2.0 + style.tick_font_size;
    let _ = writeln!(
        out,
        r#"<g font-family="{}" font-size="{}" font-weight="{}" text-anchor="middle">"#,
        escape_xml(&style.tick_font),
        style.tick_font_size,
        escape_xml(&style.tick_font_weight)
    );
    for t in &majors {
        let _ = writeln!(
            out,
            r#"<text x="{:.2}" y="{:.2}">{}</text>"#,
            frame.x(*t),
            label_y,
            format_tick(*t)
        );
    }
    out.push_str("</g>\n");

    let _ = writeln!(
        out,
        r#"<text x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
        (frame.left + frame.right) / 2.0,
        label_y + style.font_size + 4.0,
        escape_xml(TIME_HEADER)
    );
}

fn render_y_axis(out: &mut String, frame: &Frame, style: &ChartStyle) {
    let ticks = nice_ticks(frame.y_limits);

    for v in &ticks {
        let y = frame.y(*v);
        let _ = writeln!(
            out,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="black" stroke-width="{}"/>"#,
            frame.left - style.major_tick_length,
            y,
            frame.left,
            y,
            style.major_tick_width
        );
    }

    let label_x = frame.left - style.major_tick_length - 2.0;
    let _ = writeln!(
        out,
        r#"<g font-family="{}" font-size="{}" font-weight="{}" text-anchor="end" dominant-baseline="middle">"#,
        escape_xml(&style.tick_font),
        style.tick_font_size,
        escape_xml(&style.tick_font_weight)
    );
    for v in &ticks {
        let _ = writeln!(
            out,
            r#"<text x="{:.2}" y="{:.2}">{}</text>"#,
            label_x,
            frame.y(*v),
            format_tick(*v)
        );
    }
    out.push_str("</g>\n");

    let cx = (label_x - 3.0 * style.tick_font_size).max(style.font_size);
    let cy = (frame.top + frame.bottom) / 2.0;
    let _ = writeln!(
        out,
        r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" transform="rotate(-90 {:.2} {:.2})">{}</text>"#,
        cx,
        cy,
        cx,
        cy,
        escape_xml(Y_AXIS_TITLE)
    );
}

/// Outward (downward) x tick
fn tick_line(out: &mut String, x: f64, y: f64, length: f64, width: f64) {
    if length <= 0.0 || width <= 0.0 {
        return;
    }
    let _ = writeln!(
        out,
        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="black" stroke-width="{}"/>"#,
        x,
        y,
        x,
        y + length,
        width
    );
}

/// Major and minor tick positions inside the x limits
///
/// The tick count is not bounded here; `render_chart` rejects layouts that
/// would exceed `MAX_TICKS`.
pub fn x_ticks(layout: &ChartLayout) -> (Vec<f64>, Vec<f64>) {
    let (min, max) = layout.x_limits;
    let step = layout.major_tick_interval;
    if !(step.is_finite() && step > 0.0) {
        return (Vec::new(), Vec::new());
    }

    let eps = step * 1e-9;
    let first = ((min - eps) / step).ceil() as i64;
    let last = ((max + eps) / step).floor() as i64;

    let majors: Vec<f64> = (first..=last).map(|k| k as f64 * step).collect();

    let mut minors = Vec::new();
    let n = layout.num_minor_ticks;
    if n > 1 {
        for k in (first - 1)..=last {
            for j in 1..n {
                let t = (k as f64 + j as f64 / n as f64) * step;
                if t >= min - eps && t <= max + eps {
                    minors.push(t);
                }
            }
        }
    }

    (majors, minors)
}

/// Roughly five ticks at 1/2/5 x 10^k spacing
fn nice_ticks((min, max): (f64, f64)) -> Vec<f64> {
    let raw = (max - min) / 5.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(raw);

    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Integers without a decimal point, otherwise up to three decimals
pub fn format_tick(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        let rounded = value.round();
        // Avoid "-0"
        format!("{}", if rounded == 0.0 { 0.0 } else { rounded })
    } else {
        let s = format!("{:.3}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
