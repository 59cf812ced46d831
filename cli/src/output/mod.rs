//! CLI-specific output formatting
//!
//! Plain-text and JSON renderings of resolutions, route tables and pages
//! for the command-line interface.

pub mod formatters;

pub use formatters::{format_failure, format_rendered, format_resolution, format_table};

use anyhow::Result;
use serde::Serialize;

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
