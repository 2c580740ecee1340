//! Run configuration: TOML schema, loading and validation.
//!
//! The parsed [`RunConfig`] is passed explicitly to each command; nothing
//! reads process-wide settings.

pub mod loader;
pub mod schema;

pub use loader::{load_config, parse_config, validate_config, validate_display_order, Purpose};
pub use schema::{
    DisplayOrderSetting, GeneralConfig, OrderPolicy, OutputPaths, RunConfig, SeriesConfig,
};
