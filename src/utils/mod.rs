//! Utility modules for constants and error handling.

pub mod config;
pub mod error;

// Re-export commonly used error types for convenience
pub use error::{ChartError, ConfigError, LoadError, MergeError, NormalizeError, OutputError};
