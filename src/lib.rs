//! chromastack
//!
//! Normalization, offset stacking and merging of chromatography
//! detector traces, with CSV table and SVG chart export.
//!
//! This crate provides the core implementation for the
//! `chromastack` CLI tool.
//!
//! ## Getting Started
//!
//! Most users should install and use the CLI:
//!
//! ```bash
//! cargo install chromastack
//! chromastack plot --config chromastack.toml
//! ```
//!
//! The pipeline is also usable as a library:
//!
//! ```ignore
//! use chromastack::config::load_config;
//! use chromastack::commands::build_table;
//!
//! let config = load_config("chromastack.toml")?;
//! let (stacked, table) = build_table(&config)?;
//! ```

pub mod aggregator;
pub mod chart;
pub mod commands;
pub mod config;
pub mod output;
pub mod parser;
pub mod utils;
