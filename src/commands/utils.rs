use crate::aggregator::ensure_unique_labels;
use crate::config::{load_config, validate_config, validate_display_order, Purpose, RunConfig};
use crate::output::{check_destination, Confirmer, OverwritePolicy, WriteMode};
use crate::utils::error::OutputError;
use anyhow::{Context, Result};
use colored::*;
use log::debug;
use std::path::{Path, PathBuf};

/// Load a configuration file and run every check that needs no input data
///
/// For `Purpose::Plot` this includes label uniqueness and the explicit
/// display order.
pub fn load_validated(path: &Path, purpose: Purpose) -> Result<RunConfig> {
    let config = load_config(path)
        .with_context(|| format!("Failed to load configuration {}", path.display()))?;

    validate_config(&config, purpose)
        .with_context(|| format!("Invalid configuration {}", path.display()))?;

    if purpose == Purpose::Plot {
        let labels = config.labels();
        ensure_unique_labels(labels.iter().map(String::as_str))
            .context("Series labels must be unique")?;
        validate_display_order(&config).context("Invalid display order")?;
    }

    debug!(
        "Configuration OK: {} series, output base {}",
        config.series.len(),
        config.general.filename
    );

    Ok(config)
}

/// Whether an error came from a declined overwrite prompt
pub fn is_cancelled(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<OutputError>(),
            Some(OutputError::Cancelled(_))
        )
    })
}

/// Resolve how each destination may be written, before anything is loaded
pub fn check_destinations(
    paths: &[&Path],
    policy: OverwritePolicy,
    confirmer: &mut dyn Confirmer,
) -> Result<Vec<WriteMode>> {
    paths
        .iter()
        .map(|path| {
            check_destination(path, policy, confirmer)
                .with_context(|| format!("Cannot write {}", path.display()))
        })
        .collect()
}

/// Validate a configuration file and print what it describes
pub fn validate_config_file(file_path: PathBuf) -> Result<()> {
    println!("Validating configuration: {}", file_path.display());

    let config = load_validated(&file_path, Purpose::Plot)?;
    let outputs = config.output_paths();

    println!("{}", "✓ Valid configuration".green());
    println!("  Series: {}", config.series.len());
    for series in &config.series {
        let window = config.window_for(series);
        println!(
            "    {} <- {} (window [{}, {}])",
            config.series_label(series).bold(),
            config.series_path(series).display(),
            window.start,
            window.end
        );
    }
    println!("  Offset Step: {}", config.general.offset_step);
    println!("  Display Order: {:?}", config.display_order());
    println!("  Table: {}", outputs.table.display());
    println!("  Chart: {}", outputs.chart.display());

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("chromastack v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Normalize, offset-stack and merge chromatography traces.");
}
