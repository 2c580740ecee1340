//! Output writers for merged tables and charts.
//!
//! This module handles writing data to disk:
//! - Merged CSV tables (and reading them back for re-plotting)
//! - SVG charts
//! - Overwrite protection for existing destinations

pub mod table;
pub mod overwrite;
pub mod svg;

// Re-export main functions
pub use table::{read_offset_table, write_merged_table, OffsetColumn, OffsetTable};
pub use overwrite::{check_destination, Confirmer, OverwritePolicy, PromptConfirmer, WriteMode};
pub use svg::write_svg;

use crate::utils::error::OutputError;
use log::debug;
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Validate `path`, create its parent directories and open it per `mode`
///
/// `WriteMode::CreateNew` fails with `DestinationExists` if the file appeared
/// since the destination was checked.
pub(crate) fn open_destination(path: &Path, mode: WriteMode) -> Result<File, OutputError> {
    validate_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!("Cannot create directory {}: {}", parent.display(), e))
            })?;
        }
    }

    match mode {
        WriteMode::Replace => File::create(path).map_err(OutputError::WriteFailed),
        WriteMode::CreateNew => OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => OutputError::DestinationExists(path.to_path_buf()),
                _ => OutputError::WriteFailed(e),
            }),
    }
}
