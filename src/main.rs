//! chromastack CLI
//!
//! Normalizes chromatography traces against a reference window, stacks them
//! with a vertical offset and exports a merged table plus a vector chart.

use anyhow::Result;
use chromastack::commands::{
    display_version, execute_plot, execute_replot, is_cancelled, validate_config_file, PlotArgs,
    ReplotArgs,
};
use chromastack::output::{OverwritePolicy, PromptConfirmer};
use chromastack::utils::config::DEFAULT_CONFIG_FILE;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::io::IsTerminal;
use std::path::PathBuf;

/// chromastack - stacked chromatogram overlays
#[derive(Parser, Debug)]
#[command(name = "chromastack")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Normalize, stack and merge traces; write table and chart
    Plot {
        /// Run configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, env = "CHROMASTACK_CONFIG")]
        config: PathBuf,

        /// What to do when an output file already exists
        #[arg(long, value_enum)]
        on_existing: Option<OverwritePolicy>,

        /// Vertical distance between stacked traces
        #[arg(long)]
        offset_step: Option<f64>,

        /// Print per-series summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Re-render the chart from a previously exported table
    Replot {
        /// Run configuration file (style and axis settings)
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, env = "CHROMASTACK_CONFIG")]
        config: PathBuf,

        /// Merged table written by `plot`
        #[arg(short, long)]
        input: PathBuf,

        /// What to do when the chart file already exists
        #[arg(long, value_enum)]
        on_existing: Option<OverwritePolicy>,
    },

    /// Validate a run configuration file
    Validate {
        /// Run configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, env = "CHROMASTACK_CONFIG")]
        config: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let interactive = std::io::stdin().is_terminal();

    match cli.command {
        Commands::Plot {
            config,
            on_existing,
            offset_step,
            summary,
        } => {
            let args = PlotArgs {
                config,
                on_existing,
                offset_step,
                print_summary: summary,
                interactive,
            };
            stop_on_cancel(execute_plot(&args, &mut PromptConfirmer::stdio()))?;
        }

        Commands::Replot {
            config,
            input,
            on_existing,
        } => {
            let args = ReplotArgs {
                config,
                input,
                on_existing,
                interactive,
            };
            stop_on_cancel(execute_replot(&args, &mut PromptConfirmer::stdio()))?;
        }

        Commands::Validate { config } => {
            validate_config_file(config)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// A declined overwrite ends the run cleanly; other errors pass through
fn stop_on_cancel<T>(result: Result<T>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(err) if is_cancelled(&err) => {
            println!("Operation canceled.");
            Ok(())
        }
        Err(err) => Err(err),
    }
}
