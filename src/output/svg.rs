//! SVG chart output writer.
//!
//! Writes SVG content to files with proper encoding.

use super::overwrite::WriteMode;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write SVG content to a file
///
/// **Public** - main entry point for SVG output
///
/// # Arguments
/// * `svg_content` - SVG string from the chart renderer
/// * `output_path` - Path to output SVG file
/// * `mode` - Result of `check_destination` for this path
///
/// # Errors
/// * `OutputError::DestinationExists` - `CreateNew` and the file exists
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is invalid
pub fn write_svg(
    svg_content: &str,
    output_path: impl AsRef<Path>,
    mode: WriteMode,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing SVG to: {}", output_path.display());

    if output_path.extension().is_some_and(|ext| ext != "svg") {
        debug!("Warning: File does not have .svg extension: {}", output_path.display());
    }

    let file = super::open_destination(output_path, mode)?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(svg_content.as_bytes())
        .map_err(OutputError::WriteFailed)?;

    writer.flush().map_err(OutputError::WriteFailed)?;

    let file_size = svg_content.len();
    info!(
        "SVG written successfully ({} bytes, {:.2} KB)",
        file_size,
        file_size as f64 / 1024.0
    );

    Ok(())
}
